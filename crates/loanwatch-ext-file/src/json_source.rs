//! JSON snapshot source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use loanwatch_portfolio::{LoadError, SnapshotRow, SnapshotSource};
use serde_json::{Map, Value};
use tracing::debug;

use crate::record::{missing_columns, row_from_json};

// =============================================================================
// JSON SNAPSHOT SOURCE
// =============================================================================

/// JSON snapshot file: an array of row objects keyed by column name, as
/// written by record-oriented dataframe exports.
///
/// A column counts as present if any object carries it. Null values are
/// treated like empty cells.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    file_path: PathBuf,
}

impl JsonSnapshotSource {
    /// Create a new JSON snapshot source.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SnapshotSource for JsonSnapshotSource {
    fn describe(&self) -> String {
        format!("json:{}", self.file_path.display())
    }

    fn read_rows(&self) -> Result<Vec<SnapshotRow>, LoadError> {
        if !self.file_path.exists() {
            return Err(LoadError::NotFound {
                path: self.file_path.clone(),
            });
        }

        let reader = BufReader::new(File::open(&self.file_path)?);
        let records: Vec<Map<String, Value>> =
            serde_json::from_reader(reader).map_err(|e| LoadError::Parse(e.to_string()))?;

        if !records.is_empty() {
            let missing = missing_columns(records.iter().flat_map(|r| r.keys().map(String::as_str)));
            if !missing.is_empty() {
                return Err(LoadError::MissingColumns { columns: missing });
            }
        }

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| row_from_json(i as u64 + 1, record))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(path = %self.file_path.display(), rows = rows.len(), "read json snapshot");

        Ok(rows)
    }
}
