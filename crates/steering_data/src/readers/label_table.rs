use crate::error::DatasetError;
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// One row of the label table: the image filename and its raw action text.
///
/// Both cells are kept as opaque strings; a filename such as `000123.png` must
/// never be coerced to a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRecord {
    pub filename: String,
    pub action: String,
}

/// The label table, read eagerly into contiguous memory.
///
/// Cloning only bumps the `Arc` counter, so the table can be shared across
/// loader threads.
#[derive(Debug, Clone)]
pub struct LabelTable {
    records: Arc<[LabelRecord]>,
}

impl LabelTable {
    pub fn new(records: Vec<LabelRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Reads a CSV label table with a header row, locating the two columns by name.
    ///
    /// Fails on a missing column, an unreadable row or a repeated filename.
    pub fn from_csv(
        path: &Path,
        filename_column: &str,
        action_column: &str,
    ) -> Result<Self, DatasetError> {
        let table_error = |message: String| DatasetError::Table {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| table_error(format!("failed to open: {}", e)))?;

        let headers = reader
            .headers()
            .map_err(|e| table_error(format!("failed to read header: {}", e)))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| table_error(format!("missing column {:?}", name)))
        };
        let filename_idx = column(filename_column)?;
        let action_idx = column(action_column)?;

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for (row_idx, result) in reader.records().enumerate() {
            let row = result.map_err(|e| table_error(format!("row {}: {}", row_idx + 1, e)))?;
            let cell = |idx: usize, name: &str| {
                row.get(idx).map(str::to_string).ok_or_else(|| {
                    table_error(format!("row {}: missing {:?} cell", row_idx + 1, name))
                })
            };
            let filename = cell(filename_idx, filename_column)?;
            let action = cell(action_idx, action_column)?;

            if !seen.insert(filename.clone()) {
                return Err(table_error(format!(
                    "row {}: duplicate filename {:?}",
                    row_idx + 1,
                    filename
                )));
            }
            records.push(LabelRecord { filename, action });
        }

        tracing::info!(path = %path.display(), rows = records.len(), "loaded label table");
        Ok(Self::new(records))
    }

    pub fn get(&self, index: usize) -> Option<&LabelRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelRecord> {
        self.records.iter()
    }
}
