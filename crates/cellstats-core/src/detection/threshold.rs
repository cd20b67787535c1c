use ndarray::Array2;

use crate::consts::{HISTOGRAM_BINS, MAX_THRESHOLD_RANGE};
use crate::frame::GrayFrame;

/// Inclusive intensity range treated as foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThresholdRange {
    pub low: u8,
    pub high: u8,
}

impl ThresholdRange {
    pub fn new(low: u8, high: u8) -> Self {
        Self { low, high }
    }

    pub fn span(&self) -> u8 {
        self.high.saturating_sub(self.low)
    }

    /// A range this wide means foreground and background were not separated.
    pub fn is_degenerate(&self) -> bool {
        self.span() > MAX_THRESHOLD_RANGE
    }

    pub fn contains(&self, value: u8) -> bool {
        value >= self.low && value <= self.high
    }

    /// Binary mask of the pixels inside the range.
    pub fn apply(&self, frame: &GrayFrame) -> Array2<bool> {
        frame.data.mapv(|v| self.contains(v))
    }
}

impl std::fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// 256-bin intensity histogram.
pub fn histogram(frame: &GrayFrame) -> [u64; HISTOGRAM_BINS] {
    let mut hist = [0u64; HISTOGRAM_BINS];
    for &v in frame.data.iter() {
        hist[v as usize] += 1;
    }
    hist
}

/// Iterative intermeans threshold level (the ImageJ "Default" variant of
/// IsoData). The extreme bins are ignored. Returns `None` when fewer than two
/// intensity levels are present at all.
pub fn isodata_level(hist: &[u64; HISTOGRAM_BINS]) -> Option<u8> {
    if hist.iter().filter(|&&c| c > 0).count() < 2 {
        return None;
    }

    let last = HISTOGRAM_BINS - 1;
    let mut data = *hist;
    data[0] = 0;
    data[last] = 0;

    let Some(min) = data.iter().position(|&c| c > 0) else {
        return Some((HISTOGRAM_BINS / 2) as u8);
    };
    let max = data.iter().rposition(|&c| c > 0).unwrap_or(min);
    if min >= max {
        return Some((HISTOGRAM_BINS / 2) as u8);
    }

    let mut moving = min;
    let mut result;
    loop {
        let (mut sum_low, mut n_low, mut sum_high, mut n_high) = (0.0, 0.0, 0.0, 0.0);
        for (i, &c) in data.iter().enumerate().take(moving + 1).skip(min) {
            sum_low += i as f64 * c as f64;
            n_low += c as f64;
        }
        for (i, &c) in data.iter().enumerate().take(max + 1).skip(moving + 1) {
            sum_high += i as f64 * c as f64;
            n_high += c as f64;
        }
        result = (sum_low / n_low + sum_high / n_high) / 2.0;
        moving += 1;
        if !((moving + 1) as f64 <= result && moving < max - 1) {
            break;
        }
    }

    Some(result.round().clamp(0.0, last as f64) as u8)
}

/// Automatic threshold range. With a dark background the objects are the
/// pixels above the level, otherwise the pixels at or below it.
pub fn auto_threshold(frame: &GrayFrame, dark_background: bool) -> ThresholdRange {
    match isodata_level(&histogram(frame)) {
        None => ThresholdRange::new(0, u8::MAX),
        Some(level) if dark_background => ThresholdRange::new(level.saturating_add(1), u8::MAX),
        Some(level) => ThresholdRange::new(0, level),
    }
}
