//! Snapshot table sources.
//!
//! A [`SnapshotSource`] produces the full row set in one call. File-backed
//! implementations live in `loanwatch-ext-file`; [`InMemorySource`] serves
//! tests and embedding callers that already hold the rows.

use crate::error::LoadError;
use crate::types::SnapshotRow;

/// Something the portfolio store can be loaded from.
pub trait SnapshotSource: Send + Sync {
    /// Human-readable description of the source, used in logs.
    fn describe(&self) -> String;

    /// Reads every row. Either all rows are returned or an error is.
    fn read_rows(&self) -> Result<Vec<SnapshotRow>, LoadError>;
}

/// Source backed by rows already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: Vec<SnapshotRow>,
}

impl InMemorySource {
    /// Create a new in-memory source.
    #[must_use]
    pub fn new(rows: Vec<SnapshotRow>) -> Self {
        Self { rows }
    }
}

impl SnapshotSource for InMemorySource {
    fn describe(&self) -> String {
        format!("in-memory ({} rows)", self.rows.len())
    }

    fn read_rows(&self) -> Result<Vec<SnapshotRow>, LoadError> {
        Ok(self.rows.clone())
    }
}

impl<S: SnapshotSource + ?Sized> SnapshotSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn read_rows(&self) -> Result<Vec<SnapshotRow>, LoadError> {
        (**self).read_rows()
    }
}
