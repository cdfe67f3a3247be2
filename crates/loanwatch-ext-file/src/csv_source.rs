//! Delimited-text snapshot source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use loanwatch_portfolio::{LoadError, SnapshotRow, SnapshotSource};
use tracing::debug;

use crate::record::{malformed, missing_columns, RawSnapshotRecord};

/// Delimiters tried when none is configured.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

// =============================================================================
// CSV SNAPSHOT SOURCE
// =============================================================================

/// CSV (or TSV) snapshot file.
///
/// The first row must be a header naming at least the required columns;
/// extra columns are ignored. Records are deserialised by header name. Without an explicit delimiter, `.tsv` files use
/// tab and everything else is sniffed from the header line.
#[derive(Debug, Clone)]
pub struct CsvSnapshotSource {
    file_path: PathBuf,
    delimiter: Option<u8>,
}

impl CsvSnapshotSource {
    /// Create a new CSV snapshot source.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let delimiter = match file_path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(b'\t'),
            _ => None,
        };
        Self {
            file_path,
            delimiter,
        }
    }

    /// Forces a field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn resolve_delimiter(&self) -> Result<u8, LoadError> {
        if let Some(delimiter) = self.delimiter {
            return Ok(delimiter);
        }

        let mut header = String::new();
        BufReader::new(File::open(&self.file_path)?).read_line(&mut header)?;
        Ok(sniff_delimiter(&header))
    }
}

/// Picks the candidate delimiter occurring most often in the header line,
/// defaulting to a comma.
fn sniff_delimiter(header: &str) -> u8 {
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, header.bytes().filter(|b| *b == d).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(d, _)| d)
}

impl SnapshotSource for CsvSnapshotSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.file_path.display())
    }

    fn read_rows(&self) -> Result<Vec<SnapshotRow>, LoadError> {
        if !self.file_path.exists() {
            return Err(LoadError::NotFound {
                path: self.file_path.clone(),
            });
        }

        let delimiter = self.resolve_delimiter()?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(csv::Trim::All)
            .from_path(&self.file_path)
            .map_err(csv_error)?;

        let headers: StringRecord = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim())
            .collect();
        let missing = missing_columns(headers.iter());
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { columns: missing });
        }
        reader.set_headers(headers);

        let rows = reader
            .deserialize::<RawSnapshotRecord>()
            .map(|record| record.map(SnapshotRow::from).map_err(csv_error))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            path = %self.file_path.display(),
            delimiter = %char::from(delimiter).escape_default(),
            rows = rows.len(),
            "read csv snapshot"
        );

        Ok(rows)
    }
}

fn csv_error(err: csv::Error) -> LoadError {
    if let csv::ErrorKind::Deserialize { pos, err } = err.kind() {
        let line = pos.as_ref().map_or(0, csv::Position::line);
        return malformed(line, &err.kind().to_string());
    }
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io) = err.into_kind() {
            return LoadError::Io(io);
        }
        return LoadError::Parse("csv i/o error".to_string());
    }
    LoadError::Parse(err.to_string())
}
