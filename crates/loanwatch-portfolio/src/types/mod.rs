//! Core types for loan snapshot analytics.
//!
//! This module contains the fundamental types used throughout the crate:
//!
//! - [`ReportPeriod`]: Snapshot date with range ordering
//! - [`SnapshotRow`]: One contract observed at one period
//! - [`FilterCriteria`]: Optional restrictions on each filter dimension
//! - [`EngineConfig`]: Engine tuning (parallelism, validation)

mod config;
mod criteria;
mod period;
mod row;

pub use config::*;
pub use criteria::*;
pub use period::*;
pub use row::*;
