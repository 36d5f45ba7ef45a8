pub mod csv_reader;
pub mod spreadsheet_reader;

pub use csv_reader::CsvReader;
pub use spreadsheet_reader::SpreadsheetReader;

use crate::error::{ProcessingError, Result};
use crate::models::RawTable;
use std::path::Path;

/// Load the source table, choosing a reader by file extension.
pub fn read_table(path: &Path, header_row: usize, sheet: Option<&str>) -> Result<RawTable> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => SpreadsheetReader::new(header_row)
            .with_sheet(sheet.map(str::to_string))
            .read_table(path),
        "csv" | "txt" => CsvReader::new(header_row).read_table(path),
        _ => Err(ProcessingError::InvalidFormat(format!(
            "Unsupported input file '{}'. Expected .xlsx, .xls, .ods or .csv",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension() {
        let result = read_table(Path::new("turbines.parquet"), 0, None);
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_spreadsheet_is_fatal() {
        let result = read_table(Path::new("does/not/exist.xlsx"), 10, None);
        assert!(result.is_err());
    }
}
