use crate::error::{ProcessingError, Result};
use crate::schema::{normalize_header, CanonicalField};
use std::collections::HashMap;

/// A named source-file revision: where the header row sits and how its
/// columns map onto canonical fields.
#[derive(Debug, Clone)]
pub struct SchemaProfile {
    pub name: &'static str,
    /// Zero-based row index of the header, counted from the top of the sheet.
    pub header_row: usize,
    pub columns: Vec<(&'static str, CanonicalField)>,
    pub required: Vec<CanonicalField>,
    /// Text numbers use `,` as the decimal mark and `.` for thousands grouping.
    pub decimal_comma: bool,
}

const DANISH_COLUMNS: [(&str, CanonicalField); 15] = [
    ("Kommune", CanonicalField::Region),
    ("X (øst) koordinat \nUTM 32 Euref89", CanonicalField::XCoord),
    ("Y (nord) koordinat \nUTM 32 Euref89", CanonicalField::YCoord),
    ("Kapacitet (kW)", CanonicalField::CapacityKw),
    ("Model", CanonicalField::Model),
    ("Møllenummer (GSRN)", CanonicalField::GsrnNumber),
    (
        "Dato for oprindelig nettilslutning",
        CanonicalField::ConnectionDate,
    ),
    ("Rotor-diameter (m)", CanonicalField::RotorDiameterM),
    ("Navhøjde (m)", CanonicalField::HubHeightM),
    ("Fabrikat", CanonicalField::Manufacturer),
    ("Type af placering", CanonicalField::PlacementType),
    ("Ejerlav", CanonicalField::OwnerArea),
    ("Matrikel-nummer", CanonicalField::ParcelNumber),
    ("Koordinatoprindelse", CanonicalField::CoordinateOrigin),
    (
        "Netselskabets installations-nummer",
        CanonicalField::InstallationNumber,
    ),
];

const ENGLISH_COLUMNS: [(&str, CanonicalField); 15] = [
    ("Local authority", CanonicalField::Region),
    (
        "X (east) coordinate \nUTM 32 Euref89",
        CanonicalField::XCoord,
    ),
    (
        "Y (north) coordinate \nUTM 32 Euref89",
        CanonicalField::YCoord,
    ),
    ("Capacity (kW)", CanonicalField::CapacityKw),
    ("Type designation", CanonicalField::Model),
    ("Turbine identifier (GSRN)", CanonicalField::GsrnNumber),
    (
        "Date of original connection to grid",
        CanonicalField::ConnectionDate,
    ),
    ("Rotor diameter (m)", CanonicalField::RotorDiameterM),
    ("Hub height (m)", CanonicalField::HubHeightM),
    ("Manufacture", CanonicalField::Manufacturer),
    ("Type of location", CanonicalField::PlacementType),
    ("Cadastral district", CanonicalField::OwnerArea),
    ("Cadastral no.", CanonicalField::ParcelNumber),
    ("Origin of coordinates", CanonicalField::CoordinateOrigin),
    (
        "Local electricity grid installation number",
        CanonicalField::InstallationNumber,
    ),
];

impl SchemaProfile {
    pub fn danish() -> Self {
        Self {
            name: "danish",
            header_row: 10,
            columns: DANISH_COLUMNS.to_vec(),
            required: vec![
                CanonicalField::XCoord,
                CanonicalField::YCoord,
                CanonicalField::Region,
            ],
            decimal_comma: true,
        }
    }

    pub fn english() -> Self {
        Self {
            name: "english",
            header_row: 17,
            columns: ENGLISH_COLUMNS.to_vec(),
            required: vec![
                CanonicalField::XCoord,
                CanonicalField::YCoord,
                CanonicalField::Region,
                CanonicalField::CapacityKw,
                CanonicalField::Model,
            ],
            decimal_comma: false,
        }
    }

    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "danish" | "da" | "dk" => Ok(Self::danish()),
            "english" | "en" => Ok(Self::english()),
            _ => Err(ProcessingError::Config(format!(
                "Unknown schema profile '{}'. Expected 'danish' or 'english'",
                name
            ))),
        }
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn is_required(&self, field: CanonicalField) -> bool {
        self.required.contains(&field)
    }

    /// Source header (whitespace-normalized) to canonical field.
    pub fn rename_map(&self) -> HashMap<String, CanonicalField> {
        self.columns
            .iter()
            .map(|(source, field)| (normalize_header(source), *field))
            .collect()
    }
}
