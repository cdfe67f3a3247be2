//! Filter-and-aggregate engine.
//!
//! The engine narrows the store's table with [`FilterCriteria`] and reduces
//! the matching rows to one of the dashboard views:
//!
//! - **Statistics**: row count, current-default count, forward default rate
//! - **Period series**: counts and default rate per reporting period,
//!   optionally decomposed by product type
//! - **Rating histogram**: row count per rating
//!
//! Every operation validates the criteria first, reads the store without
//! modifying it, and allocates its own result.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use loanwatch_portfolio::prelude::*;
//!
//! let engine = FilterEngine::new(Arc::new(store));
//! let criteria = FilterCriteria::new().with_product_types(["Overdraft"]);
//!
//! let count = engine.count_stat(&criteria)?;
//! let by_period = engine.counts_by_period(&criteria, true)?;
//! for (product, trace) in by_period.by_product() {
//!     println!("{product}: {} periods", trace.len());
//! }
//! ```

mod parallel;
mod rating;
mod series;
mod summary;

pub use parallel::*;
pub use rating::*;
pub use series::*;
pub use summary::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{PortfolioError, PortfolioResult};
use crate::store::PortfolioStore;
use crate::types::{EngineConfig, FilterCriteria, ReportPeriod, SnapshotRow};

/// Answers filter queries against a shared, immutable store.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    store: Arc<PortfolioStore>,
    config: EngineConfig,
}

impl FilterEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(store: Arc<PortfolioStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<PortfolioStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks criteria before any filtering happens.
    ///
    /// Rejects a start period after the end period and, when catalog
    /// validation is enabled, product types or default reasons that do not
    /// occur in the table. Equal bounds are accepted and select nothing.
    pub fn validate(&self, criteria: &FilterCriteria) -> PortfolioResult<()> {
        if let (Some(start), Some(end)) = (criteria.start_period, criteria.end_period) {
            if start > end {
                return Err(PortfolioError::invalid_criteria(format!(
                    "start period {start} is after end period {end}"
                )));
            }
        }

        if !self.config.validate_catalog_values {
            return Ok(());
        }

        if let Some(products) = &criteria.product_types {
            if let Some(unknown) = products.iter().find(|p| !self.store.has_product_type(p)) {
                return Err(PortfolioError::invalid_criteria(format!(
                    "unknown product type '{unknown}'"
                )));
            }
        }

        if let Some(reasons) = &criteria.default_reasons {
            if let Some(unknown) = reasons.iter().find(|r| !self.store.has_default_reason(r)) {
                return Err(PortfolioError::invalid_criteria(format!(
                    "unknown default reason '{unknown}'"
                )));
            }
        }

        Ok(())
    }

    /// Returns the rows matching the criteria, in table order.
    pub fn filter(&self, criteria: &FilterCriteria) -> PortfolioResult<Vec<&SnapshotRow>> {
        self.validate(criteria)?;

        let rows: Vec<&SnapshotRow> = if criteria.is_unrestricted() {
            self.store.rows().iter().collect()
        } else {
            maybe_parallel_filter(self.store.rows(), &self.config, |row| criteria.matches(row))
        };

        debug!(
            ?criteria,
            matched = rows.len(),
            total = self.store.len(),
            "filtered snapshot table"
        );

        Ok(rows)
    }

    /// Number of matching rows. Zero for an empty selection.
    pub fn count_stat(&self, criteria: &FilterCriteria) -> PortfolioResult<usize> {
        Ok(self.filter(criteria)?.len())
    }

    /// Number of matching rows currently in default.
    pub fn defaults_count(&self, criteria: &FilterCriteria) -> PortfolioResult<usize> {
        Ok(self
            .filter(criteria)?
            .iter()
            .filter(|row| row.current_default)
            .count())
    }

    /// Forward default rate: matching rows that default within the horizon
    /// divided by matching rows.
    ///
    /// Returns [`PortfolioError::EmptyResult`] when no rows match.
    pub fn event_rate_stat(&self, criteria: &FilterCriteria) -> PortfolioResult<f64> {
        let rows = self.filter(criteria)?;
        PortfolioSummary::from_rows(rows)
            .event_rate
            .ok_or_else(|| PortfolioError::empty_result("event rate"))
    }

    /// Count, defaults count and event rate of the matching rows in one pass.
    pub fn summary(&self, criteria: &FilterCriteria) -> PortfolioResult<PortfolioSummary> {
        Ok(PortfolioSummary::from_rows(self.filter(criteria)?))
    }

    /// Row counts per reporting period, and per product type if `decompose`.
    pub fn counts_by_period(
        &self,
        criteria: &FilterCriteria,
        decompose: bool,
    ) -> PortfolioResult<PeriodSeries<usize>> {
        let rows = self.filter(criteria)?;

        let mut groups: BTreeMap<(ReportPeriod, Option<String>), usize> = BTreeMap::new();
        for row in rows {
            *groups.entry(group_key(row, decompose)).or_default() += 1;
        }

        Ok(PeriodSeries::from_groups(decompose, groups))
    }

    /// Row counts per rating.
    pub fn rating_histogram(&self, criteria: &FilterCriteria) -> PortfolioResult<RatingDistribution> {
        Ok(RatingDistribution::from_rows(self.filter(criteria)?))
    }

    /// Mean forward default flag per reporting period, and per product type
    /// if `decompose`.
    ///
    /// Returns [`PortfolioError::EmptyResult`] when no rows match. Groups
    /// are formed from matching rows only, so none of them is empty.
    pub fn default_rate_by_period(
        &self,
        criteria: &FilterCriteria,
        decompose: bool,
    ) -> PortfolioResult<PeriodSeries<f64>> {
        let rows = self.filter(criteria)?;
        if rows.is_empty() {
            return Err(PortfolioError::empty_result("default rate by period"));
        }

        let mut groups: BTreeMap<(ReportPeriod, Option<String>), (f64, usize)> = BTreeMap::new();
        for row in rows {
            let entry = groups.entry(group_key(row, decompose)).or_default();
            entry.0 += row.forward_default_value();
            entry.1 += 1;
        }

        let rates = groups
            .into_iter()
            .map(|(key, (sum, count))| (key, sum / count as f64))
            .collect();

        Ok(PeriodSeries::from_groups(decompose, rates))
    }
}

fn group_key(row: &SnapshotRow, decompose: bool) -> (ReportPeriod, Option<String>) {
    let product = decompose.then(|| row.product_type.clone());
    (row.report_period, product)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(month: u32) -> ReportPeriod {
        ReportPeriod::month_end(2019, month).unwrap()
    }

    /// The three-row table from the dashboard walkthrough.
    fn engine() -> FilterEngine {
        let rows = vec![
            SnapshotRow::new(period(1), "A", 5),
            SnapshotRow::new(period(1), "B", 3)
                .defaulted(Some("X"))
                .with_forward_default(true),
            SnapshotRow::new(period(2), "A", 5),
        ];
        FilterEngine::with_config(
            Arc::new(PortfolioStore::from_rows(rows)),
            EngineConfig::sequential(),
        )
    }

    #[test]
    fn test_unfiltered_statistics() {
        let engine = engine();
        let all = FilterCriteria::new();

        assert_eq!(engine.count_stat(&all).unwrap(), 3);
        assert_eq!(engine.defaults_count(&all).unwrap(), 1);
        assert!((engine.event_rate_stat(&all).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_counts_by_period() {
        let series = engine().counts_by_period(&FilterCriteria::new(), false).unwrap();
        let map = series.to_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&period(1)], 2);
        assert_eq!(map[&period(2)], 1);
    }

    #[test]
    fn test_counts_by_period_decomposed() {
        let series = engine().counts_by_period(&FilterCriteria::new(), true).unwrap();
        assert!(series.decomposed);
        assert_eq!(series.len(), 3);
        assert_eq!(series.total(), 3);

        let traces = series.by_product();
        assert_eq!(traces["A"], vec![(period(1), 1), (period(2), 1)]);
        assert_eq!(traces["B"], vec![(period(1), 1)]);
    }

    #[test]
    fn test_rating_histogram() {
        let dist = engine().rating_histogram(&FilterCriteria::new()).unwrap();
        assert_eq!(dist.sorted_by_rating(), vec![(3, 1), (5, 2)]);
    }

    #[test]
    fn test_default_rate_by_period() {
        let series = engine()
            .default_rate_by_period(&FilterCriteria::new(), false)
            .unwrap();
        let map = series.to_map().unwrap();
        assert!((map[&period(1)] - 0.5).abs() < 1e-12);
        assert!(map[&period(2)].abs() < 1e-12);
    }

    #[test]
    fn test_default_rate_by_period_decomposed() {
        let series = engine()
            .default_rate_by_period(&FilterCriteria::new(), true)
            .unwrap();
        let traces = series.by_product();
        assert_eq!(traces["B"], vec![(period(1), 1.0)]);
        assert_eq!(traces["A"], vec![(period(1), 0.0), (period(2), 0.0)]);
    }

    #[test]
    fn test_reason_filter_keeps_rows_without_reason() {
        let criteria = FilterCriteria::new().with_default_reasons(["X"]);
        assert_eq!(engine().count_stat(&criteria).unwrap(), 3);
    }

    #[test]
    fn test_product_filter() {
        let engine = engine();
        let criteria = FilterCriteria::new().with_product_types(["A"]);
        assert_eq!(engine.count_stat(&criteria).unwrap(), 2);
        assert_eq!(engine.defaults_count(&criteria).unwrap(), 0);
    }

    #[test]
    fn test_period_bounds() {
        let engine = engine();

        let criteria = FilterCriteria::new().with_period_range(period(1), period(2));
        assert_eq!(engine.count_stat(&criteria).unwrap(), 2);

        let criteria = FilterCriteria::new().with_start(period(2));
        assert_eq!(engine.count_stat(&criteria).unwrap(), 1);
    }

    #[test]
    fn test_empty_selection() {
        let engine = engine();
        let criteria = FilterCriteria::new().with_period_range(period(2), period(2));

        assert_eq!(engine.count_stat(&criteria).unwrap(), 0);
        assert_eq!(engine.defaults_count(&criteria).unwrap(), 0);
        assert!(engine.counts_by_period(&criteria, true).unwrap().is_empty());
        assert!(engine.rating_histogram(&criteria).unwrap().is_empty());
        assert!(engine.summary(&criteria).unwrap().event_rate.is_none());

        assert!(engine.event_rate_stat(&criteria).unwrap_err().is_empty_result());
        assert!(engine
            .default_rate_by_period(&criteria, false)
            .unwrap_err()
            .is_empty_result());
    }

    #[test]
    fn test_validation() {
        let engine = engine();

        let reversed = FilterCriteria::new().with_period_range(period(2), period(1));
        assert!(engine.count_stat(&reversed).unwrap_err().is_invalid_criteria());

        let unknown_product = FilterCriteria::new().with_product_types(["Leasing"]);
        let err = engine.count_stat(&unknown_product).unwrap_err();
        assert!(err.to_string().contains("Leasing"));

        let unknown_reason = FilterCriteria::new().with_default_reasons(["Fraud"]);
        assert!(engine.validate(&unknown_reason).is_err());
    }

    #[test]
    fn test_validation_can_be_relaxed() {
        let relaxed = FilterEngine::with_config(
            Arc::new(engine().store().clone()),
            EngineConfig::sequential().with_catalog_validation(false),
        );
        let criteria = FilterCriteria::new().with_product_types(["Leasing"]);
        assert_eq!(relaxed.count_stat(&criteria).unwrap(), 0);

        let reversed = FilterCriteria::new().with_period_range(period(2), period(1));
        assert!(relaxed.validate(&reversed).is_err());
    }
}
