use std::path::Path;

use regex::Regex;

use crate::config::{AnalysisConfig, NamingConvention, TokenIndices};
use crate::consts::{TOKEN_DELIMITER, WELL_NAME_SEPARATOR};
use crate::error::{CellStatsError, Result};

/// Well and slot coordinates recovered from one file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedName {
    pub well: String,
    /// File-name prefix preceding the first time/Z/channel token.
    pub descriptor: String,
    pub channel: Option<usize>,
    /// Raw Z value as written in the file name.
    pub z: Option<u32>,
    /// Raw time value as written in the file name.
    pub time: Option<u32>,
}

/// A file naming convention. One implementation per instrument scheme.
pub trait NamingScheme: Send + Sync {
    fn parse(&self, file_name: &str) -> Result<ParsedName>;
}

/// Build the naming scheme selected by the configuration.
pub fn naming_scheme(config: &AnalysisConfig) -> Result<Box<dyn NamingScheme>> {
    let labels = ChannelLabels::from_config(config);
    Ok(match config.naming {
        NamingConvention::Auto => Box::new(TokenScheme::new(config.token_indices.clone(), labels)?),
        NamingConvention::Positional => {
            Box::new(PositionalScheme::new(config.token_indices.clone(), labels)?)
        }
    })
}

/// Lower-cased channel labels and instrument names mapped to channel indices.
#[derive(Clone, Debug, Default)]
pub struct ChannelLabels {
    names: Vec<(String, usize)>,
}

impl ChannelLabels {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let mut names = Vec::new();
        for (idx, name) in config.channel_names.iter().enumerate() {
            names.push((name.trim().to_ascii_lowercase(), idx));
        }
        for (idx, role) in config.channel_labels.iter().enumerate() {
            if !role.is_skip() {
                names.push((role.to_string().to_ascii_lowercase(), idx));
            }
        }
        Self { names }
    }

    /// First channel whose label or name equals `token`, ignoring case.
    pub fn lookup(&self, token: &str) -> Option<usize> {
        let token = token.to_ascii_lowercase();
        self.names
            .iter()
            .find(|(name, _)| !name.is_empty() && *name == token)
            .map(|(_, idx)| *idx)
    }
}

fn split_tokens(file_name: &str) -> Vec<&str> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    stem.split(TOKEN_DELIMITER).collect()
}

fn unrecognized(file_name: &str, reason: impl Into<String>) -> CellStatsError {
    CellStatsError::UnrecognizedFileName {
        file: file_name.to_string(),
        reason: reason.into(),
    }
}

fn token_at<'a>(tokens: &[&'a str], idx: usize, file_name: &str) -> Result<&'a str> {
    tokens.get(idx).copied().ok_or_else(|| {
        unrecognized(
            file_name,
            format!("token index {idx} out of range ({} tokens)", tokens.len()),
        )
    })
}

fn compose_well(tokens: &[&str], indices: &[usize], file_name: &str) -> Result<String> {
    let parts = indices
        .iter()
        .map(|&i| token_at(tokens, i, file_name))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(WELL_NAME_SEPARATOR))
}

/// Tokens before `first_info` joined back with the delimiter.
fn descriptor(tokens: &[&str], first_info: Option<usize>) -> String {
    let end = first_info.unwrap_or(tokens.len()).min(tokens.len());
    tokens[..end].join(&TOKEN_DELIMITER.to_string())
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| CellStatsError::InvalidConfig(e.to_string()))
}

/// Infers token roles from their shape: `t<digits>` for time, a trailing
/// `z<digits>` for Z, `ch<digits>` (or a channel label) for the channel and
/// the left-most `A1`/`Pos3` style token for the well. Explicit indices in
/// [`TokenIndices`] take precedence per axis.
pub struct TokenScheme {
    indices: TokenIndices,
    labels: ChannelLabels,
    time_re: Regex,
    z_re: Regex,
    channel_re: Regex,
    well_re: Regex,
    digits_re: Regex,
}

impl TokenScheme {
    pub fn new(indices: TokenIndices, labels: ChannelLabels) -> Result<Self> {
        Ok(Self {
            indices,
            labels,
            time_re: compile(r"^t(\d+)$")?,
            z_re: compile(r"z(\d+)$")?,
            channel_re: compile(r"^ch(\d+)$")?,
            well_re: compile(r"^(?:[A-Z]\d+|Pos\d+)$")?,
            digits_re: compile(r"\d+")?,
        })
    }

    fn capture_number(re: &Regex, token: &str) -> Option<u32> {
        re.captures(token)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    fn channel_of(&self, token: &str) -> Option<usize> {
        Self::capture_number(&self.channel_re, token)
            .map(|n| n as usize)
            .or_else(|| self.labels.lookup(token))
    }

    /// Number carried by the token at `idx`: the pattern's capture when it
    /// matches, otherwise the first digit run (explicitly indexed tokens).
    fn axis_value(&self, re: &Regex, tokens: &[&str], idx: usize, file_name: &str) -> Result<u32> {
        let tok = token_at(tokens, idx, file_name)?;
        match Self::capture_number(re, tok) {
            Some(n) => Ok(n),
            None => self.digits(tok, file_name),
        }
    }

    fn digits(&self, token: &str, file_name: &str) -> Result<u32> {
        self.digits_re
            .find(token)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| unrecognized(file_name, format!("token '{token}' holds no number")))
    }
}

impl NamingScheme for TokenScheme {
    fn parse(&self, file_name: &str) -> Result<ParsedName> {
        let tokens = split_tokens(file_name);

        let mut t_idx = None;
        let mut z_idx = None;
        let mut ch_idx = None;
        let mut well_idx = None;
        for (i, tok) in tokens.iter().enumerate() {
            if self.time_re.is_match(tok) {
                t_idx = Some(i);
            }
            if self.z_re.is_match(tok) {
                z_idx = Some(i);
            }
            if self.channel_of(tok).is_some() {
                ch_idx = Some(i);
            }
            if well_idx.is_none() && self.well_re.is_match(tok) {
                well_idx = Some(i);
            }
        }
        let t_idx = self.indices.time.or(t_idx);
        let z_idx = self.indices.z.or(z_idx);
        let ch_idx = self.indices.channel.or(ch_idx);

        let well = if !self.indices.well.is_empty() {
            compose_well(&tokens, &self.indices.well, file_name)?
        } else {
            let idx = well_idx.ok_or_else(|| unrecognized(file_name, "no well token"))?;
            tokens[idx].to_string()
        };

        let time = t_idx
            .map(|i| self.axis_value(&self.time_re, &tokens, i, file_name))
            .transpose()?;
        let z = z_idx
            .map(|i| self.axis_value(&self.z_re, &tokens, i, file_name))
            .transpose()?;
        let channel = match ch_idx {
            Some(i) => {
                let tok = token_at(&tokens, i, file_name)?;
                Some(match self.channel_of(tok) {
                    Some(c) => c,
                    None => self.digits(tok, file_name)? as usize,
                })
            }
            None => None,
        };

        let first_info = [t_idx, z_idx, ch_idx].into_iter().flatten().min();
        Ok(ParsedName {
            well,
            descriptor: descriptor(&tokens, first_info),
            channel,
            z,
            time,
        })
    }
}

/// Reads every axis from configured token positions. Used for exports whose
/// tokens carry bare numbers that cannot be told apart by shape.
pub struct PositionalScheme {
    indices: TokenIndices,
    labels: ChannelLabels,
    digits_re: Regex,
}

impl PositionalScheme {
    /// Fails unless the well and channel token indices are configured.
    pub fn new(indices: TokenIndices, labels: ChannelLabels) -> Result<Self> {
        if indices.well.is_empty() {
            return Err(CellStatsError::MissingTokenIndex("well"));
        }
        if indices.channel.is_none() {
            return Err(CellStatsError::MissingTokenIndex("channel"));
        }
        Ok(Self {
            indices,
            labels,
            digits_re: compile(r"\d+")?,
        })
    }

    fn number(&self, tokens: &[&str], idx: usize, file_name: &str) -> Result<u32> {
        let tok = token_at(tokens, idx, file_name)?;
        self.digits_re
            .find(tok)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(|| unrecognized(file_name, format!("token '{tok}' holds no number")))
    }
}

impl NamingScheme for PositionalScheme {
    fn parse(&self, file_name: &str) -> Result<ParsedName> {
        let tokens = split_tokens(file_name);
        let well = compose_well(&tokens, &self.indices.well, file_name)?;

        let mut channel = None;
        if let Some(i) = self.indices.channel {
            let tok = token_at(&tokens, i, file_name)?;
            channel = Some(match self.labels.lookup(tok) {
                Some(c) => c,
                None => self.number(&tokens, i, file_name)? as usize,
            });
        }
        let z = self
            .indices
            .z
            .map(|i| self.number(&tokens, i, file_name))
            .transpose()?;
        let time = self
            .indices
            .time
            .map(|i| self.number(&tokens, i, file_name))
            .transpose()?;

        let first_info = [self.indices.time, self.indices.z, self.indices.channel]
            .into_iter()
            .flatten()
            .min();
        Ok(ParsedName {
            well,
            descriptor: descriptor(&tokens, first_info),
            channel,
            z,
            time,
        })
    }
}
