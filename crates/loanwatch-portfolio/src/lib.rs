//! # Loanwatch Portfolio
//!
//! Snapshot store and filter/aggregate engine for loan default monitoring.
//!
//! The crate holds a loan portfolio snapshot table (one row per contract per
//! reporting period) and answers the queries behind the monitoring
//! dashboard: how many contracts match a selection, how many of them are in
//! default, what their forward default rate is, and how those figures move
//! across reporting periods and ratings.
//!
//! ## Design Philosophy
//!
//! - **Load once**: the table is read from a [`SnapshotSource`] at startup and
//!   never mutated
//! - **Pure queries**: every view is a function of [`FilterCriteria`] only
//! - **Explicit wiring**: the [`PortfolioStore`] is shared by `Arc`, never a
//!   global
//! - **Config-driven parallelism**: optional rayon support with
//!   threshold-based switching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use loanwatch_portfolio::prelude::*;
//!
//! let store = PortfolioStore::load(&source)?;
//! let engine = FilterEngine::new(Arc::new(store));
//!
//! let criteria = FilterCriteria::new()
//!     .with_default_states([DefaultState::Defaulted, DefaultState::Healthy])
//!     .with_product_types(["Overdraft", "Term loan"]);
//!
//! let summary = engine.summary(&criteria)?;
//! let dr = engine.default_rate_by_period(&criteria, true)?;
//! let ratings = engine.rating_histogram(&criteria)?;
//! ```
//!
//! ## Module Overview
//!
//! - [`engine`] - Filtering and aggregation (statistics, series, histogram)
//! - [`error`] - Load and query errors
//! - [`source`] - Snapshot source trait and in-memory source
//! - [`store`] - Immutable snapshot table and catalogs
//! - [`types`] - Core types (period, row, criteria, config)
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel filtering for large tables

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod engine;
pub mod error;
pub mod source;
pub mod store;
pub mod types;

// Re-export error types at crate root
pub use error::{LoadError, PortfolioError, PortfolioResult};

// Re-export main types
pub use types::{
    DefaultState, EngineConfig, FilterCriteria, PeriodParseError, ReportPeriod, SnapshotRow,
};

pub use engine::{
    maybe_parallel_filter, FilterEngine, PeriodPoint, PeriodSeries, PortfolioSummary,
    RatingDistribution,
};
pub use source::{InMemorySource, SnapshotSource};
pub use store::{Catalog, DateBounds, PortfolioStore};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use loanwatch_portfolio::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{
        FilterEngine, PeriodPoint, PeriodSeries, PortfolioSummary, RatingDistribution,
    };
    pub use crate::error::{LoadError, PortfolioError, PortfolioResult};
    pub use crate::source::{InMemorySource, SnapshotSource};
    pub use crate::store::{Catalog, DateBounds, PortfolioStore};
    pub use crate::types::{DefaultState, EngineConfig, FilterCriteria, ReportPeriod, SnapshotRow};
}
