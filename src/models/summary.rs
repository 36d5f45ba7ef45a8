use serde::{Deserialize, Serialize};

use crate::models::GeoRecord;

/// Dataset-wide totals consumed by the dashboard header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_turbines: usize,
    pub total_capacity_mw: f64,
    pub offshore_turbines: usize,
    pub onshore_turbines: usize,
    pub region_count: usize,
}

impl SummaryStatistics {
    pub fn from_records<'a, I>(records: I, region_count: usize) -> Self
    where
        I: IntoIterator<Item = &'a GeoRecord>,
    {
        let mut summary = SummaryStatistics {
            region_count,
            ..Default::default()
        };
        let mut capacity_kw = 0.0;

        for record in records {
            summary.total_turbines += 1;
            if record.is_offshore {
                summary.offshore_turbines += 1;
            } else {
                summary.onshore_turbines += 1;
            }
            if let Some(capacity) = record.capacity_kw.as_number() {
                capacity_kw += capacity;
            }
        }

        summary.total_capacity_mw = capacity_kw / 1000.0;
        summary
    }
}
