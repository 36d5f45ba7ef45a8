use crate::error::ProcessingError;
use crate::models::{CellValue, NormalizedRecord, RawRecord, RawTable};
use crate::schema::{CanonicalField, FieldKind, SchemaProfile};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use tracing::debug;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y", "%d/%m/%Y"];

/// Excel serial day numbers count from 1899-12-30.
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A cell after coercion to its canonical field kind.
#[derive(Debug, Clone, PartialEq)]
enum Coerced {
    Number(f64),
    Date(NaiveDate),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub records: Vec<NormalizedRecord>,
    pub dropped_missing_required: usize,
    pub coercion_failures: usize,
}

/// Projects raw rows onto `NormalizedRecord`, coercing typed fields and
/// dropping rows that lack a required value.
pub struct RowFilter {
    required: Vec<CanonicalField>,
    decimal_comma: bool,
}

impl RowFilter {
    /// Coordinates and region are always required, whatever else the profile adds.
    pub fn new(required: Vec<CanonicalField>) -> Self {
        let mut required: Vec<CanonicalField> = [
            CanonicalField::XCoord,
            CanonicalField::YCoord,
            CanonicalField::Region,
        ]
        .into_iter()
        .chain(required)
        .collect();
        required.sort();
        required.dedup();
        Self {
            required,
            decimal_comma: false,
        }
    }

    pub fn with_decimal_comma(mut self, decimal_comma: bool) -> Self {
        self.decimal_comma = decimal_comma;
        self
    }

    pub fn from_profile(profile: &SchemaProfile) -> Self {
        Self::new(profile.required.clone()).with_decimal_comma(profile.decimal_comma)
    }

    /// Expects a table whose columns have already been normalized.
    pub fn apply(&self, table: &RawTable) -> FilterOutcome {
        let columns: HashMap<CanonicalField, usize> = CanonicalField::ALL
            .iter()
            .filter_map(|field| table.column_index(field.key()).map(|index| (*field, index)))
            .collect();

        let mut outcome = FilterOutcome::default();

        for row in &table.rows {
            let values = self.coerce_row(row, &columns, &mut outcome.coercion_failures);

            let missing: Vec<&str> = self
                .required
                .iter()
                .filter(|field| !values.contains_key(*field))
                .map(|field| field.key())
                .collect();

            if !missing.is_empty() {
                debug!(row = row.row_number, ?missing, "Dropping row with missing required fields");
                outcome.dropped_missing_required += 1;
                continue;
            }

            if let Some(record) = project(row.row_number, values) {
                outcome.records.push(record);
            }
        }

        outcome
    }

    fn coerce_row(
        &self,
        row: &RawRecord,
        columns: &HashMap<CanonicalField, usize>,
        failures: &mut usize,
    ) -> HashMap<CanonicalField, Coerced> {
        let mut values = HashMap::with_capacity(columns.len());

        for (field, index) in columns {
            match coerce(*field, row.value(*index), self.decimal_comma) {
                Ok(Some(value)) => {
                    values.insert(*field, value);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(row = row.row_number, error = %e, "Coercion failed, treating as missing");
                    *failures += 1;
                }
            }
        }

        values
    }
}

/// Declarative projection of coerced values onto the record type.
fn project(
    row_number: usize,
    mut values: HashMap<CanonicalField, Coerced>,
) -> Option<NormalizedRecord> {
    let mut number = |field: CanonicalField| match values.remove(&field) {
        Some(Coerced::Number(value)) => Some(value),
        _ => None,
    };
    let x = number(CanonicalField::XCoord)?;
    let y = number(CanonicalField::YCoord)?;
    let capacity_kw = number(CanonicalField::CapacityKw);
    let rotor_diameter_m = number(CanonicalField::RotorDiameterM);
    let hub_height_m = number(CanonicalField::HubHeightM);

    let connection_date = match values.remove(&CanonicalField::ConnectionDate) {
        Some(Coerced::Date(date)) => Some(date),
        _ => None,
    };

    let mut text = |field: CanonicalField| match values.remove(&field) {
        Some(Coerced::Text(value)) => Some(value),
        _ => None,
    };
    let region = text(CanonicalField::Region)?;

    let mut record = NormalizedRecord::new(row_number, x, y, region);
    record.capacity_kw = capacity_kw;
    record.rotor_diameter_m = rotor_diameter_m;
    record.hub_height_m = hub_height_m;
    record.connection_date = connection_date;
    record.model = text(CanonicalField::Model);
    record.gsrn_number = text(CanonicalField::GsrnNumber);
    record.manufacturer = text(CanonicalField::Manufacturer);
    record.placement_type = text(CanonicalField::PlacementType);
    record.owner_area = text(CanonicalField::OwnerArea);
    record.parcel_number = text(CanonicalField::ParcelNumber);
    record.coordinate_origin = text(CanonicalField::CoordinateOrigin);
    record.installation_number = text(CanonicalField::InstallationNumber);

    Some(record)
}

fn coerce(
    field: CanonicalField,
    cell: &CellValue,
    decimal_comma: bool,
) -> Result<Option<Coerced>, ProcessingError> {
    if cell.is_empty() {
        return Ok(None);
    }

    let coerced = match field.kind() {
        FieldKind::Numeric => coerce_number(cell, decimal_comma).map(Coerced::Number),
        FieldKind::Date => coerce_date(cell).map(Coerced::Date),
        FieldKind::Text => Some(Coerced::Text(coerce_text(cell))),
    };

    coerced.map(Some).ok_or_else(|| ProcessingError::Coercion {
        field: field.key().to_string(),
        value: cell.render(),
    })
}

fn coerce_number(cell: &CellValue, decimal_comma: bool) -> Option<f64> {
    match cell {
        CellValue::Number(value) => Some(*value).filter(|v| v.is_finite()),
        CellValue::Text(text) => parse_number(text, decimal_comma),
        _ => None,
    }
}

/// Parses a text number in either locale.
///
/// With `decimal_comma` (Danish exports) `1.234,5`, `1234,5` and `3.600`
/// read as 1234.5, 1234.5 and 3600. Otherwise `1,234.5` and `1,650` are
/// grouped and a lone `82,5` is still taken as a decimal.
pub fn parse_number(text: &str, decimal_comma: bool) -> Option<f64> {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let (group, decimal) = if decimal_comma { ('.', ',') } else { (',', '.') };

    let canonical = match (compact.contains(group), compact.contains(decimal)) {
        (true, true) => compact.replace(group, "").replace(decimal, "."),
        (true, false) if is_grouped(&compact, group) => compact.replace(group, ""),
        (true, false) => compact.replace(group, "."),
        _ => compact.replace(decimal, "."),
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `1.650` or `12.345.678`: one to three leading digits, then groups of exactly three.
fn is_grouped(text: &str, separator: char) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut parts = digits.split(separator);
    let leading_ok = parts
        .next()
        .is_some_and(|lead| (1..=3).contains(&lead.len()) && lead.bytes().all(|b| b.is_ascii_digit()));

    leading_ok && parts.all(|part| part.len() == 3 && part.bytes().all(|b| b.is_ascii_digit()))
}

fn coerce_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Number(serial) if (1.0..=MAX_EXCEL_SERIAL).contains(serial) => {
            let (year, month, day) = EXCEL_EPOCH;
            NaiveDate::from_ymd_opt(year, month, day)
                .map(|epoch| epoch + Duration::days(serial.trunc() as i64))
        }
        CellValue::Text(text) => parse_date(text),
        _ => None,
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    // Timestamps such as "2012-05-31 00:00:00" keep only the date part
    let date_part = trimmed.split([' ', 'T']).next().unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Integral numbers render without a fractional part so identifiers such as
/// GSRN numbers stay digit strings.
fn coerce_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(value) if value.fract() == 0.0 && value.abs() < 1e21 => {
            format!("{:.0}", value)
        }
        other => other.render().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .enumerate()
                .map(|(i, values)| RawRecord::new(i + 12, values))
                .collect(),
        )
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn test_drops_rows_missing_coordinates_or_region() {
        let table = table(
            &["x_coord", "y_coord", "kommune"],
            vec![
                vec![CellValue::Number(592_000.0), CellValue::Number(6_137_000.0), text("Odense")],
                vec![CellValue::Empty, CellValue::Number(6_223_000.0), text("Århus")],
                vec![CellValue::Number(575_000.0), CellValue::Number(6_223_000.0), CellValue::Empty],
            ],
        );

        let outcome = RowFilter::from_profile(&SchemaProfile::danish()).apply(&table);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].region, "Odense");
        assert_eq!(outcome.records[0].row_number, 12);
        assert_eq!(outcome.dropped_missing_required, 2);
        assert_eq!(outcome.coercion_failures, 0);
    }

    #[test]
    fn test_non_numeric_coordinate_is_coerced_to_null_and_dropped() {
        let table = table(
            &["x_coord", "y_coord", "kommune"],
            vec![vec![text("ukendt"), text("6137000"), text("Odense")]],
        );

        let outcome = RowFilter::from_profile(&SchemaProfile::danish()).apply(&table);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.coercion_failures, 1);
        assert_eq!(outcome.dropped_missing_required, 1);
    }

    #[test]
    fn test_capacity_requirement_depends_on_profile() {
        let columns = ["x_coord", "y_coord", "kommune", "capacity_kw", "model"];
        let rows = vec![vec![
            CellValue::Number(592_000.0),
            CellValue::Number(6_137_000.0),
            text("Odense"),
            text("n/a"),
            text("V112"),
        ]];

        let danish =
            RowFilter::from_profile(&SchemaProfile::danish()).apply(&table(&columns, rows.clone()));
        assert_eq!(danish.records.len(), 1);
        assert_eq!(danish.records[0].capacity_kw, None);

        let english =
            RowFilter::from_profile(&SchemaProfile::english()).apply(&table(&columns, rows));
        assert!(english.records.is_empty());
        assert_eq!(english.dropped_missing_required, 1);
    }

    #[test]
    fn test_descriptive_fields_are_projected() {
        let table = table(
            &[
                "x_coord",
                "y_coord",
                "kommune",
                "capacity_kw",
                "gsrn_number",
                "connection_date",
                "hub_height_m",
                "placement_type",
                "Bemærkning",
            ],
            vec![vec![
                text("592000,5"),
                CellValue::Number(6_137_000.0),
                text(" Odense "),
                text("3.600,0"),
                CellValue::Number(570_715_000_000_012_345.0),
                CellValue::Date(NaiveDate::from_ymd_opt(2014, 3, 1).unwrap()),
                text("94"),
                text("LAND"),
                text("ignored"),
            ]],
        );

        let outcome = RowFilter::from_profile(&SchemaProfile::danish()).apply(&table);
        let record = &outcome.records[0];

        assert_eq!(record.x, 592_000.5);
        assert_eq!(record.region, "Odense");
        assert_eq!(record.capacity_kw, Some(3600.0));
        assert_eq!(record.hub_height_m, Some(94.0));
        assert_eq!(record.connection_date, NaiveDate::from_ymd_opt(2014, 3, 1));
        assert!(record.gsrn_number.as_deref().unwrap().starts_with("5707150000000"));
        assert_eq!(record.placement_type.as_deref(), Some("LAND"));
        assert_eq!(record.manufacturer, None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("82,5", true), Some(82.5));
        assert_eq!(parse_number("1.234,5", true), Some(1234.5));
        assert_eq!(parse_number(" 3600 ", true), Some(3600.0));
        assert_eq!(parse_number("1 650", true), Some(1650.0));
        assert_eq!(parse_number("NaN", true), None);
        assert_eq!(parse_number("ukendt", true), None);
    }

    #[test]
    fn test_danish_thousands_grouping() {
        assert_eq!(parse_number("3.600", true), Some(3600.0));
        assert_eq!(parse_number("1.650", true), Some(1650.0));
        assert_eq!(parse_number("6.137.000", true), Some(6_137_000.0));
        assert_eq!(parse_number("82.5", true), Some(82.5));
        assert_eq!(parse_number("592000.5", true), Some(592_000.5));
    }

    #[test]
    fn test_english_number_format() {
        assert_eq!(parse_number("3.600", false), Some(3.6));
        assert_eq!(parse_number("1,650", false), Some(1650.0));
        assert_eq!(parse_number("1,234.5", false), Some(1234.5));
        assert_eq!(parse_number("82,5", false), Some(82.5));
    }

    #[test]
    fn test_grouped_capacity_text_in_danish_rows() {
        let table = table(
            &["x_coord", "y_coord", "kommune", "capacity_kw"],
            vec![vec![text("592000"), text("6137000"), text("Odense"), text("3.600")]],
        );

        let danish = RowFilter::from_profile(&SchemaProfile::danish()).apply(&table);
        assert_eq!(danish.records[0].capacity_kw, Some(3600.0));
    }

    #[test]
    fn test_padded_text_is_trimmed() {
        let table = table(
            &["x_coord", "y_coord", "kommune", "model"],
            vec![
                vec![CellValue::Number(592_000.0), CellValue::Number(6_137_000.0), text("Odense "), text(" V112")],
                vec![CellValue::Number(592_500.0), CellValue::Number(6_137_400.0), text("Odense"), text("V112")],
            ],
        );

        let outcome = RowFilter::from_profile(&SchemaProfile::danish()).apply(&table);

        assert_eq!(outcome.records[0].region, outcome.records[1].region);
        assert_eq!(outcome.records[0].model.as_deref(), Some("V112"));
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2012, 5, 31);
        assert_eq!(parse_date("2012-05-31"), expected);
        assert_eq!(parse_date("31-05-2012"), expected);
        assert_eq!(parse_date("31.05.2012"), expected);
        assert_eq!(parse_date("2012-05-31 00:00:00"), expected);
        assert_eq!(parse_date("someday"), None);
    }

    #[test]
    fn test_excel_serial_dates() {
        assert_eq!(
            coerce_date(&CellValue::Number(41061.0)),
            NaiveDate::from_ymd_opt(2012, 6, 1)
        );
        assert_eq!(coerce_date(&CellValue::Number(-3.0)), None);
    }
}
