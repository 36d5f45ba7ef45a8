use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row after column renaming and coercion. Required fields are guaranteed
/// present; everything else stays optional until export fills in the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub row_number: usize,
    pub x: f64,
    pub y: f64,
    pub region: String,
    pub capacity_kw: Option<f64>,
    pub model: Option<String>,
    pub gsrn_number: Option<String>,
    pub connection_date: Option<NaiveDate>,
    pub rotor_diameter_m: Option<f64>,
    pub hub_height_m: Option<f64>,
    pub manufacturer: Option<String>,
    pub placement_type: Option<String>,
    pub owner_area: Option<String>,
    pub parcel_number: Option<String>,
    pub coordinate_origin: Option<String>,
    pub installation_number: Option<String>,
}

impl NormalizedRecord {
    pub fn new(row_number: usize, x: f64, y: f64, region: String) -> Self {
        Self {
            row_number,
            x,
            y,
            region,
            capacity_kw: None,
            model: None,
            gsrn_number: None,
            connection_date: None,
            rotor_diameter_m: None,
            hub_height_m: None,
            manufacturer: None,
            placement_type: None,
            owner_area: None,
            parcel_number: None,
            coordinate_origin: None,
            installation_number: None,
        }
    }

    /// The registry marks sea-based turbines with placement type "HAV".
    pub fn is_offshore(&self) -> bool {
        self.placement_type.as_deref().is_some_and(|placement| {
            let placement = placement.trim();
            placement.eq_ignore_ascii_case("hav") || placement.eq_ignore_ascii_case("offshore")
        })
    }
}
