//! Portfolio store: the snapshot table and its catalogs.
//!
//! The store is built once, either from a [`SnapshotSource`] or directly
//! from rows, and never changes afterwards. Share it behind an `Arc` with the
//! code that issues queries.

mod catalog;

pub use catalog::*;

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::PortfolioResult;
use crate::source::SnapshotSource;
use crate::types::{ReportPeriod, SnapshotRow};

/// Immutable in-memory snapshot table.
#[derive(Debug, Clone, Default)]
pub struct PortfolioStore {
    rows: Vec<SnapshotRow>,
    product_types: Vec<String>,
    default_reasons: Vec<String>,
    date_bounds: Option<DateBounds>,
}

impl PortfolioStore {
    /// Loads the table from a source.
    ///
    /// Fails with [`crate::PortfolioError::Load`] if the source cannot be
    /// read; no partially loaded store is ever returned.
    pub fn load(source: &dyn SnapshotSource) -> PortfolioResult<Self> {
        let rows = source.read_rows()?;
        let store = Self::from_rows(rows);

        info!(
            source = %source.describe(),
            rows = store.len(),
            product_types = store.product_types.len(),
            default_reasons = store.default_reasons.len(),
            bounds = ?store.date_bounds.map(|b| (b.start.to_string(), b.end.to_string())),
            "loaded snapshot table"
        );

        Ok(store)
    }

    /// Builds the store from rows already in memory.
    #[must_use]
    pub fn from_rows(rows: Vec<SnapshotRow>) -> Self {
        let mut product_types: Vec<String> = Vec::new();
        let mut default_reasons: Vec<String> = Vec::new();
        let mut seen_products: HashSet<&str> = HashSet::new();
        let mut seen_reasons: HashSet<&str> = HashSet::new();
        let mut bounds: Option<(ReportPeriod, ReportPeriod)> = None;
        let mut orphan_reasons = 0usize;

        for row in &rows {
            if seen_products.insert(&row.product_type) {
                product_types.push(row.product_type.clone());
            }
            if let Some(reason) = &row.default_reason {
                if seen_reasons.insert(reason) {
                    default_reasons.push(reason.clone());
                }
            }
            if row.has_orphan_reason() {
                orphan_reasons += 1;
            }

            let period = row.report_period;
            bounds = Some(match bounds {
                None => (period, period),
                Some((lo, hi)) => (lo.min(period), hi.max(period)),
            });
        }

        if orphan_reasons > 0 {
            warn!(
                rows = orphan_reasons,
                "rows carry a default reason without a current default"
            );
        }

        Self {
            rows,
            product_types,
            default_reasons,
            date_bounds: bounds.map(|(start, end)| DateBounds { start, end }),
        }
    }

    /// Returns every row in load order.
    #[must_use]
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct product types, in first-seen order.
    #[must_use]
    pub fn product_types(&self) -> &[String] {
        &self.product_types
    }

    /// Distinct non-absent default reasons, in first-seen order.
    #[must_use]
    pub fn default_reasons(&self) -> &[String] {
        &self.default_reasons
    }

    /// Earliest and latest reporting period in the table.
    #[must_use]
    pub fn date_bounds(&self) -> Option<DateBounds> {
        self.date_bounds
    }

    /// Returns true if the product type occurs in the table.
    #[must_use]
    pub fn has_product_type(&self, product_type: &str) -> bool {
        self.product_types.iter().any(|p| p == product_type)
    }

    /// Returns true if the default reason occurs in the table.
    #[must_use]
    pub fn has_default_reason(&self, reason: &str) -> bool {
        self.default_reasons.iter().any(|r| r == reason)
    }

    /// Owned snapshot of the catalogs.
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        Catalog {
            product_types: self.product_types.clone(),
            default_reasons: self.default_reasons.clone(),
            date_bounds: self.date_bounds,
            row_count: self.rows.len(),
        }
    }
}
