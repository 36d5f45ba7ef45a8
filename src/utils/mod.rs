pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use coordinates::TransverseMercator;
pub use filename::{region_file_name, region_file_stem};
pub use logging::init_logging;
pub use progress::ProgressReporter;
