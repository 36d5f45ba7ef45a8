use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::NormalizedRecord;

/// A JSON value that is either a native number or a string (including the
/// "unknown" sentinel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn number_or(value: Option<f64>, sentinel: &str) -> Self {
        match value {
            Some(number) => FieldValue::Number(number),
            None => FieldValue::Text(sentinel.to_string()),
        }
    }

    pub fn text_or(value: Option<String>, sentinel: &str) -> Self {
        FieldValue::Text(value.unwrap_or_else(|| sentinel.to_string()))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => Some(*number),
            FieldValue::Text(_) => None,
        }
    }
}

/// Exported turbine entry. Field order here is the key order in the JSON files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoRecord {
    /// Longitude in decimal degrees (WGS84).
    #[validate(range(min = -180.0, max = 180.0))]
    pub x_coord: f64,

    /// Latitude in decimal degrees (WGS84).
    #[validate(range(min = -90.0, max = 90.0))]
    pub y_coord: f64,

    pub model: FieldValue,
    pub capacity_kw: FieldValue,

    #[validate(length(min = 1))]
    pub kommune: String,

    pub gsrn_number: FieldValue,
    pub connection_date: FieldValue,
    pub rotor_diameter_m: FieldValue,
    pub hub_height_m: FieldValue,
    pub manufacturer: FieldValue,
    pub placement_type: FieldValue,
    pub owner_area: FieldValue,
    pub parcel_number: FieldValue,
    pub coordinate_origin: FieldValue,
    pub installation_number: FieldValue,
    pub is_offshore: bool,
}

impl GeoRecord {
    pub fn from_normalized(
        record: NormalizedRecord,
        longitude: f64,
        latitude: f64,
        sentinel: &str,
    ) -> Self {
        let is_offshore = record.is_offshore();
        let connection_date = record
            .connection_date
            .map(|date| date.format("%Y-%m-%d").to_string());

        Self {
            x_coord: longitude,
            y_coord: latitude,
            model: FieldValue::text_or(record.model, sentinel),
            capacity_kw: FieldValue::number_or(record.capacity_kw, sentinel),
            kommune: record.region,
            gsrn_number: FieldValue::text_or(record.gsrn_number, sentinel),
            connection_date: FieldValue::text_or(connection_date, sentinel),
            rotor_diameter_m: FieldValue::number_or(record.rotor_diameter_m, sentinel),
            hub_height_m: FieldValue::number_or(record.hub_height_m, sentinel),
            manufacturer: FieldValue::text_or(record.manufacturer, sentinel),
            placement_type: FieldValue::text_or(record.placement_type, sentinel),
            owner_area: FieldValue::text_or(record.owner_area, sentinel),
            parcel_number: FieldValue::text_or(record.parcel_number, sentinel),
            coordinate_origin: FieldValue::text_or(record.coordinate_origin, sentinel),
            installation_number: FieldValue::text_or(record.installation_number, sentinel),
            is_offshore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_record() -> NormalizedRecord {
        let mut record = NormalizedRecord::new(11, 592_000.0, 6_137_000.0, "Odense".into());
        record.capacity_kw = Some(3600.0);
        record.model = Some("V112".into());
        record.connection_date = NaiveDate::from_ymd_opt(2014, 3, 1);
        record
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let geo = GeoRecord::from_normalized(sample_record(), 10.45, 55.37, "unknown");

        assert_eq!(geo.capacity_kw, FieldValue::Number(3600.0));
        assert_eq!(geo.connection_date, FieldValue::Text("2014-03-01".into()));
        assert_eq!(geo.hub_height_m, FieldValue::Text("unknown".into()));
        assert_eq!(geo.manufacturer, FieldValue::Text("unknown".into()));
        assert!(geo.validate().is_ok());
    }

    #[test]
    fn test_key_order_and_native_numbers() {
        let geo = GeoRecord::from_normalized(sample_record(), 10.45, 55.37, "unknown");
        let json = serde_json::to_string(&geo).unwrap();

        assert!(json.starts_with(r#"{"x_coord":10.45,"y_coord":55.37,"model":"V112","capacity_kw":3600.0,"kommune":"Odense""#));
        assert!(json.ends_with(r#""is_offshore":false}"#));
    }

    #[test]
    fn test_out_of_range_coordinates_fail_validation() {
        let geo = GeoRecord::from_normalized(sample_record(), 200.0, 55.37, "unknown");
        assert!(geo.validate().is_err());
    }
}
