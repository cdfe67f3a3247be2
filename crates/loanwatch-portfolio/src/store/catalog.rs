//! Catalog snapshot for populating selection widgets.

use serde::{Deserialize, Serialize};

use crate::types::{DefaultState, FilterCriteria, ReportPeriod};

/// Observation date range of the loaded table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    /// Earliest reporting period.
    pub start: ReportPeriod,
    /// Latest reporting period.
    pub end: ReportPeriod,
}

/// Distinct categorical values and date bounds of the loaded table.
///
/// Derived once at load time; fixed for the life of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Product types, first-seen order.
    pub product_types: Vec<String>,
    /// Default reasons, first-seen order.
    pub default_reasons: Vec<String>,
    /// Observation bounds; `None` for an empty table.
    pub date_bounds: Option<DateBounds>,
    /// Number of rows in the table.
    pub row_count: usize,
}

impl Catalog {
    /// The dashboard's initial selection: both default states, every product
    /// type, every default reason and the full date range.
    ///
    /// The upper date bound is exclusive, so the selection ends the day after
    /// the latest period to keep the last snapshot visible.
    #[must_use]
    pub fn default_selection(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_default_states([DefaultState::Defaulted, DefaultState::Healthy])
            .with_product_types(self.product_types.iter().cloned())
            .with_default_reasons(self.default_reasons.iter().cloned());

        if let Some(bounds) = self.date_bounds {
            criteria = criteria.with_start(bounds.start);
            if let Some(next) = bounds.end.date().succ_opt() {
                criteria = criteria.with_end(ReportPeriod::new(next));
            }
        }

        criteria
    }
}
