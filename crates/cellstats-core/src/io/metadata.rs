//! Instrument property files (Leica `*_Properties.xml`).
//!
//! Only the values the analysis consumes are extracted: channel LUT names,
//! pixel pitch along X/Y and the number of Z slices.

use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::consts::PROPERTIES_SUFFIX;
use crate::error::{CellStatsError, Result};

/// Values read from a property file that replace static configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataOverrides {
    pub channel_names: Option<Vec<String>>,
    /// Micrometres per pixel along X.
    pub pixel_width: Option<f64>,
    /// Micrometres per pixel along Y.
    pub pixel_height: Option<f64>,
    pub num_z: Option<usize>,
}

/// Location of the property file for a well descriptor.
pub fn properties_path(metadata_dir: &Path, descriptor: &str) -> PathBuf {
    metadata_dir.join(format!("{descriptor}{PROPERTIES_SUFFIX}"))
}

/// Read and parse a property file.
pub fn read_properties(path: &Path) -> Result<MetadataOverrides> {
    let contents = std::fs::read_to_string(path)?;
    parse_properties(&contents).map_err(|reason| CellStatsError::Metadata {
        path: path.to_path_buf(),
        reason,
    })
}

/// Parse the contents of a property file.
pub fn parse_properties(xml: &str) -> std::result::Result<MetadataOverrides, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut overrides = MetadataOverrides::default();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                visit_element(&e, &stack, &mut overrides)?;
                stack.push(element_name(&e));
            }
            Ok(Event::Empty(e)) => visit_element(&e, &stack, &mut overrides)?,
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "XML error at position {}: {e}",
                    reader.error_position()
                ))
            }
            _ => {}
        }
    }

    Ok(overrides)
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn under(stack: &[String], path: &[&str]) -> bool {
    stack.len() >= path.len()
        && stack[stack.len() - path.len()..]
            .iter()
            .zip(path)
            .all(|(a, b)| a == b)
}

fn visit_element(
    e: &BytesStart,
    stack: &[String],
    overrides: &mut MetadataOverrides,
) -> std::result::Result<(), String> {
    if under(stack, &["Image", "ImageDescription", "Channels"]) {
        let name = attribute(e, "LUTName")?.unwrap_or_default();
        overrides.channel_names.get_or_insert_with(Vec::new).push(name);
    } else if under(stack, &["Image", "ImageDescription", "Dimensions"]) {
        let Some(dim_id) = attribute(e, "DimID")? else {
            return Ok(());
        };
        let count: usize = required(e, "NumberOfElements")?
            .trim()
            .parse()
            .map_err(|err| format!("bad NumberOfElements for dimension {dim_id}: {err}"))?;
        match dim_id.as_str() {
            "X" | "Y" => {
                if count == 0 {
                    return Err(format!("dimension {dim_id} has zero elements"));
                }
                let length: f64 = required(e, "Length")?
                    .trim()
                    .parse()
                    .map_err(|err| format!("bad Length for dimension {dim_id}: {err}"))?;
                let unit = attribute(e, "Unit")?.unwrap_or_default();
                let pixel = length * unit_to_micrometres(&unit) / count as f64;
                if dim_id == "X" {
                    overrides.pixel_width = Some(pixel);
                } else {
                    overrides.pixel_height = Some(pixel);
                }
            }
            "Z" => overrides.num_z = Some(count),
            _ => {}
        }
    }
    Ok(())
}

fn attribute(e: &BytesStart, key: &str) -> std::result::Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr.unescape_value().map_err(|err| err.to_string())?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required(e: &BytesStart, key: &str) -> std::result::Result<String, String> {
    attribute(e, key)?.ok_or_else(|| format!("<{}> lacks attribute {key}", element_name(e)))
}

/// Multiplier converting a length unit into micrometres. Unknown units are
/// taken as micrometres.
pub fn unit_to_micrometres(unit: &str) -> f64 {
    match unit.trim() {
        "m" => 1e6,
        "cm" => 1e4,
        "mm" => 1e3,
        "um" | "\u{b5}m" | "\u{3bc}m" => 1.0,
        "nm" => 1e-3,
        _ => 1.0,
    }
}
