//! Period-ordered aggregate series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::ReportPeriod;

/// One aggregated value for a period, optionally for a single product type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPoint<T> {
    /// Reporting period.
    pub period: ReportPeriod,

    /// Product type, set only in decomposed series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,

    /// Aggregated value.
    pub value: T,
}

/// Series of aggregated values ordered by period ascending, then by product
/// type ascending within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries<T> {
    /// Whether points are broken down by product type.
    pub decomposed: bool,

    /// Points in period order.
    pub points: Vec<PeriodPoint<T>>,
}

impl<T> PeriodSeries<T> {
    /// Builds a series from grouped values. Map order gives series order.
    pub(crate) fn from_groups(
        decomposed: bool,
        groups: BTreeMap<(ReportPeriod, Option<String>), T>,
    ) -> Self {
        let points = groups
            .into_iter()
            .map(|((period, product_type), value)| PeriodPoint {
                period,
                product_type,
                value,
            })
            .collect();

        Self { decomposed, points }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> impl Iterator<Item = &PeriodPoint<T>> {
        self.points.iter()
    }

    /// Distinct periods in ascending order.
    #[must_use]
    pub fn periods(&self) -> Vec<ReportPeriod> {
        let mut periods: Vec<ReportPeriod> = self.points.iter().map(|p| p.period).collect();
        periods.dedup();
        periods
    }
}

impl<T: Clone> PeriodSeries<T> {
    /// Period → value map. `None` for decomposed series, where one period
    /// holds several values.
    #[must_use]
    pub fn to_map(&self) -> Option<BTreeMap<ReportPeriod, T>> {
        if self.decomposed {
            return None;
        }
        Some(
            self.points
                .iter()
                .map(|p| (p.period, p.value.clone()))
                .collect(),
        )
    }

    /// Splits a decomposed series into one period-ordered trace per product
    /// type. Empty for series that are not decomposed.
    #[must_use]
    pub fn by_product(&self) -> BTreeMap<String, Vec<(ReportPeriod, T)>> {
        let mut traces: BTreeMap<String, Vec<(ReportPeriod, T)>> = BTreeMap::new();
        for point in &self.points {
            if let Some(product) = &point.product_type {
                traces
                    .entry(product.clone())
                    .or_default()
                    .push((point.period, point.value.clone()));
            }
        }
        traces
    }
}

impl PeriodSeries<usize> {
    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.value).sum()
    }
}
