use crate::error::{ProcessingError, Result};
use crate::models::{CellValue, RawRecord, RawTable};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads CSV exports of the registry. Excel on Danish locales writes
/// semicolon-separated Windows-1252 files, so both the delimiter and the
/// encoding are detected.
///
/// `header_row` counts physical lines from the top of the file (blank lines
/// included), matching how sheet rows are counted in a workbook. The header
/// is the first record starting at or below that line.
pub struct CsvReader {
    header_row: usize,
}

impl CsvReader {
    pub fn new(header_row: usize) -> Self {
        Self { header_row }
    }

    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let bytes = fs::read(path)?;
        let text = decode(&bytes);
        self.parse(&text)
    }

    pub fn parse(&self, text: &str) -> Result<RawTable> {
        let delimiter = detect_delimiter(text);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut columns = None;
        let mut rows = Vec::new();

        for (index, result) in reader.records().enumerate() {
            let record = result?;
            // One-based line the record starts on; the csv crate skips blank lines
            let line = record
                .position()
                .map(|position| position.line() as usize)
                .unwrap_or(index + 1);
            if line <= self.header_row {
                continue;
            }

            if columns.is_none() {
                columns = Some(
                    record
                        .iter()
                        .enumerate()
                        .map(|(i, field)| match field.trim() {
                            "" => format!("Unnamed: {}", i),
                            name => name.to_string(),
                        })
                        .collect::<Vec<_>>(),
                );
                continue;
            }

            let raw = RawRecord::new(line, record.iter().map(CellValue::from_text).collect());
            if !raw.is_blank() {
                rows.push(raw);
            }
        }

        let columns = columns.ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "CSV has no header at record {}",
                self.header_row + 1
            ))
        })?;

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            delimiter = %(delimiter as char),
            "Read CSV table"
        );

        Ok(RawTable::new(columns, rows))
    }
}

fn decode(bytes: &[u8]) -> Cow<'_, str> {
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8.decode_with_bom_removal(bytes).0
    } else {
        debug!("Input is not valid UTF-8, decoding as Windows-1252");
        WINDOWS_1252.decode(bytes).0
    }
}

fn detect_delimiter(text: &str) -> u8 {
    let sample: String = text.chars().take(8192).collect();
    let semicolons = sample.matches(';').count();
    let commas = sample.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_semicolon_export_with_preamble() {
        let text = "Stamdataregister;;\n;;\nKommune;Kapacitet (kW);Model\nOdense;3600;V112\n;;\nAssens;850;V52\n";
        let table = CsvReader::new(2).parse(text).unwrap();

        assert_eq!(table.columns, vec!["Kommune", "Kapacitet (kW)", "Model"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].row_number, 4);
        assert_eq!(table.rows[1].value(0), &CellValue::Text("Assens".into()));
    }

    #[test]
    fn test_blank_preamble_lines_count_toward_header_offset() {
        let text = "Stamdataregister\n\nKommune;Model\nOdense;V112\n";
        let table = CsvReader::new(2).parse(text).unwrap();

        assert_eq!(table.columns, vec!["Kommune", "Model"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].row_number, 4);
    }

    #[test]
    fn test_row_numbers_follow_multi_line_header() {
        let text = "Kommune;\"X (øst) koordinat \nUTM 32 Euref89\"\nOdense;592000\n\nAssens;575000\n";
        let table = CsvReader::new(0).parse(text).unwrap();

        assert_eq!(table.rows[0].row_number, 3);
        assert_eq!(table.rows[1].row_number, 5);
    }

    #[test]
    fn test_quoted_header_with_line_break() {
        let text = "Kommune,\"X (øst) koordinat \nUTM 32 Euref89\"\nOdense,592000\n";
        let table = CsvReader::new(0).parse(text).unwrap();

        assert_eq!(table.columns[1], "X (øst) koordinat \nUTM 32 Euref89");
        assert_eq!(table.rows[0].value(1), &CellValue::Text("592000".into()));
    }

    #[test]
    fn test_windows_1252_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        // "Kommune;Model\nÅrhus;V90\n" in Windows-1252
        file.write_all(b"Kommune;Model\n\xC5rhus;V90\n")?;

        let table = CsvReader::new(0).read_table(file.path())?;
        assert_eq!(table.rows[0].value(0), &CellValue::Text("Århus".into()));
        Ok(())
    }

    #[test]
    fn test_missing_header() {
        let result = CsvReader::new(5).parse("a,b\n1,2\n");
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }
}
