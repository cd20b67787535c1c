/// Number of histogram bins for 8-bit auto-thresholding.
pub const HISTOGRAM_BINS: usize = 256;

/// Threshold ranges wider than this (out of 255) mean the auto-threshold
/// could not separate foreground from background; the frame is ignored.
pub const MAX_THRESHOLD_RANGE: u8 = 230;

/// Minimum particle size (pixels) for brightfield frames. Brightfield looks
/// for one large cell body, so small debris is dropped.
pub const BRIGHTFIELD_MIN_SIZE: usize = 40;

/// Minimum particle size (pixels) for fluorescent frames.
pub const FLUORESCENT_MIN_SIZE: usize = 5;

/// Minimum circularity for every channel role.
pub const DEFAULT_MIN_CIRCULARITY: f64 = 0.02;

/// Denominator substituted for a zero brightfield area when computing
/// percentages. Kept at 1 to match historical reports.
pub const ZERO_AREA_SENTINEL: f64 = 1.0;

/// Delimiter between file name tokens.
pub const TOKEN_DELIMITER: char = '_';

/// Separator used when several tokens form a composite well name.
pub const WELL_NAME_SEPARATOR: &str = "-";

/// Directory inside the input directory holding instrument property files.
pub const METADATA_DIR: &str = "MetaData";

/// Suffix appended to a well descriptor to form its property file name.
pub const PROPERTIES_SUFFIX: &str = "_Properties.xml";

/// Name of the combined multi-well report.
pub const GLOBAL_REPORT_NAME: &str = "AllResults.csv";

/// Default analysis ROI: keeps the scale bar at the bottom of the frame out.
pub const DEFAULT_ROI: (usize, usize, usize, usize) = (0, 0, 1024, 980);

/// Correction per outline corner when estimating a traced perimeter.
pub const CORNER_CORRECTION: f64 = 2.0 - std::f64::consts::SQRT_2;
