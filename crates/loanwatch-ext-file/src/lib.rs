//! # Loanwatch Ext File
//!
//! File-based snapshot sources for the Loanwatch portfolio store.
//!
//! This crate provides the readers used at startup by the server and the CLI:
//! - CSV/TSV source with header validation and delimiter sniffing
//! - JSON source reading an array of row objects
//!
//! Spreadsheet workbooks are exported to CSV before loading.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod csv_source;
mod json_source;
mod record;

pub use csv_source::*;
pub use json_source::*;
pub use record::{CONTRACT_ID_COLUMNS, REQUIRED_COLUMNS};

use std::path::Path;

use loanwatch_portfolio::{LoadError, SnapshotSource};

/// Create a snapshot source for a file, choosing the reader by extension.
///
/// `csv`, `tsv` and `txt` map to [`CsvSnapshotSource`], `json` to
/// [`JsonSnapshotSource`]. The file itself is only opened when rows are read.
pub fn open_snapshot_source(
    file_path: impl AsRef<Path>,
) -> Result<Box<dyn SnapshotSource>, LoadError> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv" | "tsv" | "txt") => Ok(Box::new(CsvSnapshotSource::new(path))),
        Some("json") => Ok(Box::new(JsonSnapshotSource::new(path))),
        _ => Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
