use chrono::NaiveDate;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A loosely typed spreadsheet cell, as read before any schema is applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl CellValue {
    /// Blank strings are treated as absent, matching how spreadsheet exports
    /// represent missing values.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Number(value) => value.is_nan(),
            _ => false,
        }
    }

    /// Raw textual rendering, used for diagnostics and for text fields.
    pub fn render(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => value.to_string(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One data row of the source table. `values` is aligned with `RawTable::columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// One-based row number in the source sheet, for diagnostics.
    pub row_number: usize,
    pub values: Vec<CellValue>,
}

impl RawRecord {
    pub fn new(row_number: usize, values: Vec<CellValue>) -> Self {
        Self { row_number, values }
    }

    /// Ragged rows are padded implicitly: a missing trailing cell reads as empty.
    pub fn value(&self, index: usize) -> &CellValue {
        self.values.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(CellValue::is_empty)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
