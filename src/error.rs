use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(
        "Missing required columns after renaming: {missing:?} (available columns: {available:?})"
    )]
    Schema {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("Cannot coerce value '{value}' of field '{field}'")]
    Coercion { field: String, value: String },

    #[error("Cannot project coordinate ({x}, {y}): {reason}")]
    Projection { x: f64, y: f64, reason: String },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Workbook contains no usable sheet: {0}")]
    EmptyWorkbook(String),
}

impl ProcessingError {
    /// Row-level errors are isolated to a single record and never abort a run.
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            ProcessingError::Coercion { .. } | ProcessingError::Projection { .. }
        )
    }
}
