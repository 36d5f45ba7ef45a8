use crate::error::{ProcessingError, Result};
use crate::models::RawTable;
use crate::schema::{normalize_header, CanonicalField, SchemaProfile};
use std::collections::HashMap;
use tracing::{debug, error};

/// Renames source headers to canonical keys and checks the required set.
pub struct ColumnNormalizer {
    rename: HashMap<String, CanonicalField>,
    required: Vec<CanonicalField>,
}

impl ColumnNormalizer {
    pub fn new(rename: HashMap<String, CanonicalField>, required: Vec<CanonicalField>) -> Self {
        let rename = rename
            .into_iter()
            .map(|(source, field)| (normalize_header(&source), field))
            .collect();
        Self { rename, required }
    }

    pub fn from_profile(profile: &SchemaProfile) -> Self {
        Self::new(profile.rename_map(), profile.required.clone())
    }

    /// Unmatched columns are left untouched. A column that already carries a
    /// canonical key (a previously normalized export) counts as present.
    pub fn normalize(&self, mut table: RawTable) -> Result<RawTable> {
        let mut renamed = 0;
        for column in table.columns.iter_mut() {
            if let Some(field) = self.rename.get(&normalize_header(column)) {
                debug!(from = %column.escape_debug(), to = field.key(), "Renaming column");
                *column = field.key().to_string();
                renamed += 1;
            }
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .map(|field| field.key())
            .filter(|key| table.column_index(key).is_none())
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            error!(?missing, available = ?table.columns, "Required columns absent after renaming");
            return Err(ProcessingError::Schema {
                missing,
                available: table.columns,
            });
        }

        debug!(renamed, columns = table.columns.len(), "Columns normalized");
        Ok(table)
    }
}
