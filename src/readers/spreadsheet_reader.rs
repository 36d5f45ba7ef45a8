use crate::error::{ProcessingError, Result};
use crate::models::{CellValue, RawRecord, RawTable};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

/// Reads the registry workbook (`.xlsx`, `.xls`, `.ods`).
pub struct SpreadsheetReader {
    header_row: usize,
    sheet: Option<String>,
}

impl SpreadsheetReader {
    pub fn new(header_row: usize) -> Self {
        Self {
            header_row,
            sheet: None,
        }
    }

    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn read_table(&self, path: &Path) -> Result<RawTable> {
        let mut workbook = open_workbook_auto(path)?;

        let range = match &self.sheet {
            Some(name) => workbook.worksheet_range(name)?,
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| ProcessingError::EmptyWorkbook(path.display().to_string()))??,
        };

        self.range_to_table(&range)
    }

    /// `header_row` is counted from the top of the sheet, but calamine ranges
    /// start at the first non-empty cell.
    fn range_to_table(&self, range: &Range<Data>) -> Result<RawTable> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        if self.header_row < first_row {
            return Err(ProcessingError::InvalidFormat(format!(
                "Header row {} lies above the first populated row {}",
                self.header_row + 1,
                first_row + 1
            )));
        }

        let mut rows = range.rows().skip(self.header_row - first_row);
        let header = rows.next().ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Sheet has no header at row {}",
                self.header_row + 1
            ))
        })?;

        let columns = header
            .iter()
            .enumerate()
            .map(|(index, cell)| match cell_to_value(cell) {
                CellValue::Empty => format!("Unnamed: {}", index),
                value => value.render(),
            })
            .collect::<Vec<_>>();

        let records = rows
            .enumerate()
            .map(|(offset, cells)| {
                RawRecord::new(
                    self.header_row + offset + 2,
                    cells.iter().map(cell_to_value).collect(),
                )
            })
            .filter(|record| !record.is_blank())
            .collect::<Vec<_>>();

        debug!(
            columns = columns.len(),
            rows = records.len(),
            "Read worksheet range"
        );

        Ok(RawTable::new(columns, records))
    }
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::from_text(text),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(datetime) => datetime
            .as_datetime()
            .map(|dt| CellValue::Date(dt.date()))
            .unwrap_or(CellValue::Number(datetime.as_f64())),
        Data::DateTimeIso(text) => text
            .get(..10)
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::from_text(text)),
        Data::DurationIso(text) => CellValue::from_text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: Vec<((u32, u32), Data)>) -> Range<Data> {
        let cells = cells
            .into_iter()
            .map(|(pos, value)| calamine::Cell::new(pos, value))
            .collect();
        Range::from_sparse(cells)
    }

    #[test]
    fn test_header_offset_counts_from_sheet_top() {
        // Title in row 0, blank rows, header in row 3, data in rows 4-5
        let range = sheet(vec![
            ((0, 0), Data::String("Stamdataregister for vindmøller".into())),
            ((3, 0), Data::String("Kommune".into())),
            ((3, 1), Data::String("Kapacitet (kW)".into())),
            ((4, 0), Data::String("Odense".into())),
            ((4, 1), Data::Float(3600.0)),
            ((5, 0), Data::String("Assens".into())),
            ((5, 1), Data::Int(850)),
        ]);

        let table = SpreadsheetReader::new(3).range_to_table(&range).unwrap();

        assert_eq!(table.columns, vec!["Kommune", "Kapacitet (kW)"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].row_number, 5);
        assert_eq!(table.rows[1].value(1), &CellValue::Number(850.0));
    }

    #[test]
    fn test_blank_rows_and_unnamed_headers() {
        let range = sheet(vec![
            ((0, 0), Data::String("Kommune".into())),
            ((0, 2), Data::String("Model".into())),
            ((1, 0), Data::String("Odense".into())),
            ((3, 0), Data::String("Assens".into())),
        ]);

        let table = SpreadsheetReader::new(0).range_to_table(&range).unwrap();

        assert_eq!(table.columns, vec!["Kommune", "Unnamed: 1", "Model"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_header_above_populated_range_is_rejected() {
        let range = sheet(vec![((5, 0), Data::String("Kommune".into()))]);
        let result = SpreadsheetReader::new(2).range_to_table(&range);
        assert!(matches!(result, Err(ProcessingError::InvalidFormat(_))));
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_to_value(&Data::Error(calamine::CellErrorType::NA)), CellValue::Empty);
        assert_eq!(
            cell_to_value(&Data::DateTimeIso("2012-05-31T00:00:00".into())),
            CellValue::Date(NaiveDate::from_ymd_opt(2012, 5, 31).unwrap())
        );
        assert_eq!(cell_to_value(&Data::String("  ".into())), CellValue::Empty);
    }
}
