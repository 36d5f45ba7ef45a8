use crate::error::{ProcessingError, Result};
use crate::models::{GeoRecord, NormalizedRecord};
use crate::utils::constants::UNKNOWN_SENTINEL;
use crate::utils::coordinates::TransverseMercator;
use tracing::warn;
use validator::Validate;

/// Inverse results are re-projected forward and must land within this
/// distance (metres) of the input.
const ROUND_TRIP_TOLERANCE_M: f64 = 1e-3;

#[derive(Debug, Clone, Default)]
pub struct ReprojectionOutcome {
    pub records: Vec<GeoRecord>,
    pub failures: usize,
}

/// Converts planar UTM 32N coordinates into WGS84 longitude/latitude.
pub struct Reprojector {
    projection: TransverseMercator,
    sentinel: String,
}

impl Reprojector {
    pub fn new() -> Self {
        Self {
            projection: TransverseMercator::utm32n(),
            sentinel: UNKNOWN_SENTINEL.to_string(),
        }
    }

    pub fn with_sentinel(mut self, sentinel: &str) -> Self {
        self.sentinel = sentinel.to_string();
        self
    }

    /// (x, y) in metres to (longitude, latitude) in degrees.
    pub fn reproject(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let (longitude, latitude) = self.projection.to_geographic(x, y)?;

        let (x_check, y_check) = self.projection.to_planar(longitude, latitude)?;
        if (x_check - x).abs() > ROUND_TRIP_TOLERANCE_M || (y_check - y).abs() > ROUND_TRIP_TOLERANCE_M
        {
            return Err(ProcessingError::Projection {
                x,
                y,
                reason: format!(
                    "inverse transform did not converge (round trip gave {:.3}, {:.3})",
                    x_check, y_check
                ),
            });
        }

        Ok((longitude, latitude))
    }

    pub fn to_geo_record(&self, record: NormalizedRecord) -> Result<GeoRecord> {
        let (longitude, latitude) = self.reproject(record.x, record.y)?;
        let geo = GeoRecord::from_normalized(record, longitude, latitude, &self.sentinel);
        geo.validate()?;
        Ok(geo)
    }

    /// A failing row is logged and excluded; it never aborts the batch.
    pub fn reproject_all(&self, records: Vec<NormalizedRecord>) -> ReprojectionOutcome {
        let mut outcome = ReprojectionOutcome {
            records: Vec::with_capacity(records.len()),
            failures: 0,
        };

        for record in records {
            let (row, x, y) = (record.row_number, record.x, record.y);
            match self.to_geo_record(record) {
                Ok(geo) => outcome.records.push(geo),
                Err(e) if e.is_row_level() => {
                    warn!(row, x, y, error = %e, "Excluding row with invalid coordinates");
                    outcome.failures += 1;
                }
                Err(e) => {
                    warn!(row, error = %e, "Excluding row that failed validation");
                    outcome.failures += 1;
                }
            }
        }

        outcome
    }
}

impl Default for Reprojector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    #[test]
    fn test_reprojection_is_deterministic() {
        let reprojector = Reprojector::new();
        let first = reprojector.reproject(592_000.0, 6_137_000.0).unwrap();
        for _ in 0..10 {
            let again = reprojector.reproject(592_000.0, 6_137_000.0).unwrap();
            assert!((again.0 - first.0).abs() < 1e-9);
            assert!((again.1 - first.1).abs() < 1e-9);
        }
        assert!((first.0 - 10.451_675_086_7).abs() < 1e-7);
        assert!((first.1 - 55.370_673_907_4).abs() < 1e-7);
    }

    #[test]
    fn test_bad_row_is_excluded_not_fatal() {
        let reprojector = Reprojector::new().with_sentinel("N/A");
        let records = vec![
            NormalizedRecord::new(12, 592_000.0, 6_137_000.0, "Odense".into()),
            NormalizedRecord::new(13, -5.0e7, 6_137_000.0, "Odense".into()),
            NormalizedRecord::new(14, 575_000.0, 6_223_000.0, "Aarhus".into()),
        ];

        let outcome = reprojector.reproject_all(records);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.failures, 1);
        assert_eq!(outcome.records[1].kommune, "Aarhus");
        assert_eq!(outcome.records[0].model, FieldValue::Text("N/A".into()));
    }
}
