pub mod geo;
pub mod normalized;
pub mod raw;
pub mod summary;

pub use geo::{FieldValue, GeoRecord};
pub use normalized::NormalizedRecord;
pub use raw::{CellValue, RawRecord, RawTable};
pub use summary::SummaryStatistics;
