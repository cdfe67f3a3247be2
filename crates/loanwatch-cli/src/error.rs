//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Empty or otherwise unusable filter value.
    #[error("Invalid filter value for --{flag}: '{value}'")]
    InvalidFilter {
        /// Flag name without dashes.
        flag: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
