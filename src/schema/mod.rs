pub mod profile;

pub use profile::SchemaProfile;

use serde::{Deserialize, Serialize};

/// How a canonical field is coerced from a raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Date,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    XCoord,
    YCoord,
    Region,
    CapacityKw,
    Model,
    GsrnNumber,
    ConnectionDate,
    RotorDiameterM,
    HubHeightM,
    Manufacturer,
    PlacementType,
    OwnerArea,
    ParcelNumber,
    CoordinateOrigin,
    InstallationNumber,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::XCoord,
        CanonicalField::YCoord,
        CanonicalField::Region,
        CanonicalField::CapacityKw,
        CanonicalField::Model,
        CanonicalField::GsrnNumber,
        CanonicalField::ConnectionDate,
        CanonicalField::RotorDiameterM,
        CanonicalField::HubHeightM,
        CanonicalField::Manufacturer,
        CanonicalField::PlacementType,
        CanonicalField::OwnerArea,
        CanonicalField::ParcelNumber,
        CanonicalField::CoordinateOrigin,
        CanonicalField::InstallationNumber,
    ];

    /// Column name after renaming, also the JSON key in exported files.
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::XCoord => "x_coord",
            CanonicalField::YCoord => "y_coord",
            CanonicalField::Region => "kommune",
            CanonicalField::CapacityKw => "capacity_kw",
            CanonicalField::Model => "model",
            CanonicalField::GsrnNumber => "gsrn_number",
            CanonicalField::ConnectionDate => "connection_date",
            CanonicalField::RotorDiameterM => "rotor_diameter_m",
            CanonicalField::HubHeightM => "hub_height_m",
            CanonicalField::Manufacturer => "manufacturer",
            CanonicalField::PlacementType => "placement_type",
            CanonicalField::OwnerArea => "owner_area",
            CanonicalField::ParcelNumber => "parcel_number",
            CanonicalField::CoordinateOrigin => "coordinate_origin",
            CanonicalField::InstallationNumber => "installation_number",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CanonicalField::XCoord
            | CanonicalField::YCoord
            | CanonicalField::CapacityKw
            | CanonicalField::RotorDiameterM
            | CanonicalField::HubHeightM => FieldKind::Numeric,
            CanonicalField::ConnectionDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

/// Collapse runs of whitespace (including embedded line breaks) so that header
/// revisions differing only in layout still match.
pub fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = CanonicalField::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), CanonicalField::ALL.len());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(
            normalize_header("X (øst) koordinat \nUTM 32 Euref89"),
            "X (øst) koordinat UTM 32 Euref89"
        );
        assert_eq!(normalize_header("  Kommune "), "Kommune");
    }

    #[test]
    fn test_field_kinds() {
        assert_eq!(CanonicalField::CapacityKw.kind(), FieldKind::Numeric);
        assert_eq!(CanonicalField::ConnectionDate.kind(), FieldKind::Date);
        assert_eq!(CanonicalField::GsrnNumber.kind(), FieldKind::Text);
        assert_eq!(CanonicalField::Region.kind(), FieldKind::Text);
    }
}
