pub mod column_normalizer;
pub mod pipeline;
pub mod region_grouper;
pub mod reprojector;
pub mod row_filter;

pub use column_normalizer::ColumnNormalizer;
pub use pipeline::{Pipeline, PipelineOptions, PipelineReport};
pub use region_grouper::group_by_region;
pub use reprojector::{ReprojectionOutcome, Reprojector};
pub use row_filter::{FilterOutcome, RowFilter};
