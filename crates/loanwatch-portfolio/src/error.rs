//! Error types for the snapshot store and the filter engine.
//!
//! [`LoadError`] covers everything that can go wrong while reading the
//! snapshot table; it is fatal at startup. [`PortfolioError`] is the error
//! type of every store and engine operation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors raised while loading the snapshot table.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file does not exist.
    #[error("Snapshot file not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The source could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header lacks one or more required columns.
    #[error("Missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Every required column that was not found.
        columns: Vec<String>,
    },

    /// A cell could not be interpreted.
    #[error("Malformed value at line {line}, column '{column}': {reason}")]
    Malformed {
        /// 1-based line (or record) number.
        line: u64,
        /// Column name.
        column: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// The file extension does not map to a known reader.
    #[error("Unsupported snapshot format: {}", path.display())]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// The source was structurally unreadable (bad CSV framing, invalid JSON).
    #[error("Parse error: {0}")]
    Parse(String),
}

impl LoadError {
    /// Create a malformed value error.
    #[must_use]
    pub fn malformed(line: u64, column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            column: column.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during store and engine operations.
#[derive(Error, Debug)]
pub enum PortfolioError {
    /// The snapshot table could not be loaded.
    #[error("Failed to load snapshot table: {0}")]
    Load(#[from] LoadError),

    /// A rate was requested over zero rows.
    #[error("No rows match the criteria for {operation}")]
    EmptyResult {
        /// The aggregate that was requested.
        operation: String,
    },

    /// The filter criteria are malformed or name unknown catalog values.
    #[error("Invalid criteria: {reason}")]
    InvalidCriteria {
        /// Why the criteria were rejected.
        reason: String,
    },
}

impl PortfolioError {
    /// Create an empty result error.
    #[must_use]
    pub fn empty_result(operation: impl Into<String>) -> Self {
        Self::EmptyResult {
            operation: operation.into(),
        }
    }

    /// Create an invalid criteria error.
    #[must_use]
    pub fn invalid_criteria(reason: impl Into<String>) -> Self {
        Self::InvalidCriteria {
            reason: reason.into(),
        }
    }

    /// Returns true for load failures.
    #[must_use]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Load(_))
    }

    /// Returns true when a rate aggregate saw no rows.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult { .. })
    }

    /// Returns true when the criteria were rejected.
    #[must_use]
    pub fn is_invalid_criteria(&self) -> bool {
        matches!(self, Self::InvalidCriteria { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortfolioError::invalid_criteria("start after end");
        assert!(err.to_string().contains("start after end"));

        let err = PortfolioError::empty_result("event rate");
        assert!(err.to_string().contains("event rate"));

        let err = LoadError::MissingColumns {
            columns: vec!["report_dt".into(), "rating".into()],
        };
        assert_eq!(err.to_string(), "Missing required columns: report_dt, rating");

        let err = LoadError::malformed(7, "cur_default", "expected 0 or 1");
        assert!(err.to_string().contains("line 7"));
        assert!(err.to_string().contains("cur_default"));
    }

    #[test]
    fn test_predicates() {
        let err: PortfolioError = LoadError::NotFound {
            path: PathBuf::from("data/missing.csv"),
        }
        .into();
        assert!(err.is_load_error());
        assert!(!err.is_empty_result());
        assert!(err.to_string().contains("data/missing.csv"));

        assert!(PortfolioError::empty_result("x").is_empty_result());
        assert!(PortfolioError::invalid_criteria("x").is_invalid_criteria());
    }
}
