//! CSV text for the per-well, per-slot and multi-well reports.

use std::fmt::Write as _;
use std::path::Path;

use crate::config::AnalysisConfig;
use crate::detection::MEASUREMENT_COLUMNS;
use crate::error::{CellStatsError, Result};
use crate::measure::ParticleRecord;

use super::{percent_of_total, WellResult, WellRow};

/// Column titles of the reported channels. A role used by several channels
/// gets the channel number appended.
pub fn channel_titles(config: &AnalysisConfig) -> Vec<String> {
    let reported = config.reported_channels();
    reported
        .iter()
        .map(|&(channel, role)| {
            let shared = reported.iter().filter(|(_, r)| *r == role).count() > 1;
            if shared {
                format!("{role} ch{channel:02}")
            } else {
                role.to_string()
            }
        })
        .collect()
}

fn results_header(titles: &[String]) -> String {
    let mut header = String::from("Well,Z,T,Brightfield area");
    for title in titles {
        let _ = write!(header, ",{title} count,{title} area,percent {title}");
    }
    header.push('\n');
    header
}

fn format_row(row: &WellRow) -> String {
    let mut line = format!("{},{},{},{:.4}", row.well, row.z, row.t, row.total_area);
    for ch in &row.channels {
        let _ = write!(line, ",{},{:.4},{:.4}", ch.count, ch.area, ch.percent);
    }
    line.push('\n');
    line
}

/// Per-well report: one row per (Z, time).
pub fn well_report(result: &WellResult) -> String {
    let mut out = results_header(&result.titles);
    for row in &result.rows {
        out.push_str(&format_row(row));
    }
    out
}

/// Header titles shared by every well of a multi-well report.
///
/// Instrument metadata may change a well's channels, so the titles come from
/// the wells themselves; `fallback` is used when there are none. Wells that
/// disagree cannot share one table.
pub fn global_titles(results: &[WellResult], fallback: Vec<String>) -> Result<Vec<String>> {
    let Some(first) = results.first() else {
        return Ok(fallback);
    };
    if let Some(other) = results.iter().find(|r| r.titles != first.titles) {
        return Err(CellStatsError::InvalidConfig(format!(
            "well {} reports channels [{}] but well {} reports [{}]",
            first.well,
            first.titles.join(", "),
            other.well,
            other.titles.join(", ")
        )));
    }
    Ok(first.titles.clone())
}

/// Multi-well report; rows follow the order of `results`.
pub fn global_report(results: &[WellResult], titles: &[String]) -> String {
    let mut out = results_header(titles);
    for row in results.iter().flat_map(|r| r.rows.iter()) {
        out.push_str(&format_row(row));
    }
    out
}

/// Report header for a measurement name; `%` reads as `percent `.
pub fn column_header(name: &str) -> String {
    name.replace('%', "percent ")
}

/// Every measured column of every particle of one slot.
pub fn particle_table(records: &[ParticleRecord]) -> String {
    let mut out = String::from("Index");
    for name in MEASUREMENT_COLUMNS {
        out.push(',');
        out.push_str(&column_header(name));
    }
    out.push('\n');

    for record in records {
        let _ = write!(out, "{}", record.index);
        for value in record.values() {
            let _ = write!(out, ",{value:.4}");
        }
        out.push('\n');
    }
    out
}

/// Per-channel totals of a well relative to its brightfield area.
pub fn summary_report(result: &WellResult) -> String {
    let reference = result.brightfield_area();
    let mut out = String::from("Channel,Role,Count,Total area,percent of brightfield\n");
    for summary in &result.summaries {
        let _ = writeln!(
            out,
            "{},{},{},{:.4},{:.4}",
            summary.channel,
            summary.role,
            summary.count,
            summary.total_area,
            percent_of_total(summary.total_area, reference)
        );
    }
    out
}

/// Write report text to `path`, replacing any previous file.
pub fn write_report(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)?;
    Ok(())
}
