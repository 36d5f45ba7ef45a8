/// Output file names
pub const SUMMARY_FILE: &str = "summary_statistics.json";
pub const JSON_EXTENSION: &str = "json";
pub const INDEX_FILE: &str = "index.html";

/// Default locations
pub const DEFAULT_INPUT_FILE: &str = "data/anlaeg.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "data/communes";
pub const DEFAULT_WEB_ROOT: &str = "static";
pub const DEFAULT_CONFIG_FILE: &str = "windfarm.toml";
pub const ENV_PREFIX: &str = "WINDFARM";

/// Server defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Placeholder for absent descriptive attributes
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// GRS80 ellipsoid (ETRS89)
pub const GRS80_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
pub const GRS80_FLATTENING: f64 = 1.0 / 298.257_222_101;

/// UTM zone 32N (EPSG:25832)
pub const UTM_SCALE_FACTOR: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
pub const UTM32_CENTRAL_MERIDIAN: f64 = 9.0;

/// Accepted planar domain for UTM 32N input, in metres
pub const MIN_EASTING: f64 = 0.0;
pub const MAX_EASTING: f64 = 1_000_000.0;
pub const MIN_NORTHING: f64 = 0.0;
pub const MAX_NORTHING: f64 = 9_350_000.0;
