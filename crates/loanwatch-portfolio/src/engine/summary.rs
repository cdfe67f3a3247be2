//! Statistic-card summary.

use serde::{Deserialize, Serialize};

use crate::types::SnapshotRow;

/// The three dashboard statistics computed in a single pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of filtered rows.
    pub count: usize,

    /// Rows currently in default.
    pub defaults_count: usize,

    /// Rows defaulting within the forward horizon.
    pub forward_defaults: usize,

    /// `forward_defaults / count`; `None` when no rows match.
    pub event_rate: Option<f64>,
}

impl PortfolioSummary {
    /// Summarises rows.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a SnapshotRow>) -> Self {
        let (count, defaults_count, forward_defaults) =
            rows.into_iter().fold((0, 0, 0), |(n, d, f), row| {
                (
                    n + 1,
                    d + usize::from(row.current_default),
                    f + usize::from(row.forward_default),
                )
            });

        let event_rate = (count > 0).then(|| forward_defaults as f64 / count as f64);

        Self {
            count,
            defaults_count,
            forward_defaults,
            event_rate,
        }
    }
}
