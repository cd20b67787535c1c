//! Per-well accumulation of particle records into (Z, time) rows and
//! per-channel summaries.

pub mod report;

use std::collections::BTreeMap;

use crate::channel::ChannelRole;
use crate::config::AnalysisConfig;
use crate::consts::ZERO_AREA_SENTINEL;
use crate::frame::Slot;
use crate::measure::ParticleRecord;

pub use report::{
    channel_titles, column_header, global_report, global_titles, particle_table, summary_report,
    well_report, write_report,
};

/// `area / total`, with a zero total replaced by [`ZERO_AREA_SENTINEL`].
///
/// A zero channel area therefore gives 0 rather than NaN, and a non-zero area
/// over a zero total gives the area itself.
pub fn fraction_of_total(area: f64, total: f64) -> f64 {
    let total = if total == 0.0 { ZERO_AREA_SENTINEL } else { total };
    area / total
}

/// [`fraction_of_total`] as a percentage.
pub fn percent_of_total(area: f64, total: f64) -> f64 {
    100.0 * fraction_of_total(area, total)
}

/// Count/area/percent columns of one reported channel in one row.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelColumns {
    pub channel: usize,
    pub role: ChannelRole,
    pub count: usize,
    pub area: f64,
    pub percent: f64,
}

/// One (Z, time) row of a well report.
#[derive(Clone, Debug, PartialEq)]
pub struct WellRow {
    pub well: String,
    pub z: usize,
    pub t: usize,
    /// Summed brightfield particle area, unclamped.
    pub total_area: f64,
    pub channels: Vec<ChannelColumns>,
}

/// Well-level aggregate for one non-skipped channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelAreaSummary {
    pub channel: usize,
    pub role: ChannelRole,
    /// Brightfield: largest single particle over Z/T. Fluorescent: sum.
    pub total_area: f64,
    pub count: usize,
}

impl ChannelAreaSummary {
    /// Total area with zero replaced by the sentinel.
    pub fn clamped_total(&self) -> f64 {
        if self.total_area == 0.0 {
            ZERO_AREA_SENTINEL
        } else {
            self.total_area
        }
    }
}

/// Everything reported for one well.
#[derive(Clone, Debug, PartialEq)]
pub struct WellResult {
    pub well: String,
    /// Titles of the reported channels under this well's effective
    /// configuration, one per entry of each row's `channels`.
    pub titles: Vec<String>,
    pub rows: Vec<WellRow>,
    pub summaries: Vec<ChannelAreaSummary>,
    /// Particle records of every slot that produced at least one particle.
    pub particles: BTreeMap<Slot, Vec<ParticleRecord>>,
}

impl WellResult {
    /// Brightfield reference area for percentages, before clamping.
    pub fn brightfield_area(&self) -> f64 {
        self.summaries
            .iter()
            .filter(|s| s.role.is_brightfield())
            .map(|s| s.total_area)
            .fold(0.0, f64::max)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.values().map(Vec::len).sum()
    }
}

/// Collects particle records of one well, slot by slot.
#[derive(Clone, Debug)]
pub struct WellAccumulator {
    well: String,
    titles: Vec<String>,
    roles: Vec<ChannelRole>,
    num_z: usize,
    num_t: usize,
    records: BTreeMap<Slot, Vec<ParticleRecord>>,
}

impl WellAccumulator {
    pub fn new(well: &str, config: &AnalysisConfig, num_z: usize, num_t: usize) -> Self {
        Self {
            well: well.to_string(),
            titles: channel_titles(config),
            roles: config.channel_labels.clone(),
            num_z,
            num_t,
            records: BTreeMap::new(),
        }
    }

    /// Store the records of one slot. Slots of skipped channels and slots
    /// without particles are kept out of the particle tables.
    pub fn record(&mut self, slot: Slot, records: Vec<ParticleRecord>) {
        if records.is_empty() || self.role(slot.channel).is_skip() {
            return;
        }
        self.records.entry(slot).or_default().extend(records);
    }

    fn role(&self, channel: usize) -> ChannelRole {
        self.roles.get(channel).copied().unwrap_or_default()
    }

    fn slot_records(&self, slot: Slot) -> &[ParticleRecord] {
        self.records.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    fn slot_area(&self, slot: Slot) -> f64 {
        self.slot_records(slot).iter().map(|r| r.area).sum()
    }

    /// One row per (Z, time), Z-major.
    pub fn rows(&self) -> Vec<WellRow> {
        let mut rows = Vec::with_capacity(self.num_z * self.num_t);
        for z in 0..self.num_z {
            for t in 0..self.num_t {
                let total_area: f64 = self
                    .roles
                    .iter()
                    .enumerate()
                    .filter(|(_, role)| role.is_brightfield())
                    .map(|(c, _)| self.slot_area(Slot::new(c, z, t)))
                    .sum();

                let channels = self
                    .roles
                    .iter()
                    .enumerate()
                    .filter(|(_, role)| role.is_reported())
                    .map(|(c, &role)| {
                        let slot = Slot::new(c, z, t);
                        let area = self.slot_area(slot);
                        ChannelColumns {
                            channel: c,
                            role,
                            count: self.slot_records(slot).len(),
                            area,
                            percent: percent_of_total(area, total_area),
                        }
                    })
                    .collect();

                rows.push(WellRow {
                    well: self.well.clone(),
                    z,
                    t,
                    total_area,
                    channels,
                });
            }
        }
        rows
    }

    /// Per-channel well totals over every Z and time.
    pub fn summaries(&self) -> Vec<ChannelAreaSummary> {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, role)| !role.is_skip())
            .map(|(c, &role)| {
                let records = self
                    .records
                    .iter()
                    .filter(|(slot, _)| slot.channel == c)
                    .flat_map(|(_, r)| r.iter());
                let (count, total_area) = if role.is_brightfield() {
                    records.fold((0, 0.0_f64), |(n, max), r| (n + 1, max.max(r.area)))
                } else {
                    records.fold((0, 0.0), |(n, sum), r| (n + 1, sum + r.area))
                };
                ChannelAreaSummary {
                    channel: c,
                    role,
                    total_area,
                    count,
                }
            })
            .collect()
    }

    pub fn finish(self) -> WellResult {
        let rows = self.rows();
        let summaries = self.summaries();
        WellResult {
            well: self.well,
            titles: self.titles,
            rows,
            summaries,
            particles: self.records,
        }
    }
}
