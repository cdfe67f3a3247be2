//! Rating histogram.
//!
//! Provides the distribution of filtered rows by credit rating bucket.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::SnapshotRow;

/// Distribution of rows by rating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDistribution {
    /// Row count per rating, ordered by rating ascending.
    pub by_rating: BTreeMap<i32, usize>,

    /// Total number of rows counted.
    pub total: usize,
}

impl RatingDistribution {
    /// Builds the histogram from rows.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a SnapshotRow>) -> Self {
        let mut by_rating: BTreeMap<i32, usize> = BTreeMap::new();
        let mut total = 0;
        for row in rows {
            *by_rating.entry(row.rating).or_default() += 1;
            total += 1;
        }
        Self { by_rating, total }
    }

    /// Returns true if no rows were counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Returns the row count for a rating.
    #[must_use]
    pub fn get(&self, rating: i32) -> Option<usize> {
        self.by_rating.get(&rating).copied()
    }

    /// Returns the fraction of rows carrying the rating.
    #[must_use]
    pub fn share(&self, rating: i32) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.get(rating).unwrap_or(0) as f64 / self.total as f64)
    }

    /// Returns `(rating, count)` pairs, rating ascending.
    #[must_use]
    pub fn sorted_by_rating(&self) -> Vec<(i32, usize)> {
        self.by_rating.iter().map(|(r, c)| (*r, *c)).collect()
    }

    /// Returns the count-weighted average rating.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let sum: f64 = self
            .by_rating
            .iter()
            .map(|(rating, count)| f64::from(*rating) * *count as f64)
            .sum();
        Some(sum / self.total as f64)
    }
}
