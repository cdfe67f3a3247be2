//! Filter criteria for narrowing the snapshot table.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ReportPeriod, SnapshotRow};

/// Default state switch as exposed on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultState {
    /// Contracts currently in default.
    #[serde(alias = "default")]
    Defaulted,
    /// Contracts not in default.
    Healthy,
}

impl DefaultState {
    /// The `current_default` flag this state selects.
    #[must_use]
    pub fn flag(self) -> bool {
        matches!(self, Self::Defaulted)
    }
}

impl FromStr for DefaultState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "defaulted" | "default" => Ok(Self::Defaulted),
            "healthy" => Ok(Self::Healthy),
            other => Err(format!(
                "Unknown default state: {other} (expected 'defaulted' or 'healthy')"
            )),
        }
    }
}

impl fmt::Display for DefaultState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaulted => write!(f, "defaulted"),
            Self::Healthy => write!(f, "healthy"),
        }
    }
}

/// Filter criteria. Every dimension is optional; an absent (or empty) set
/// places no restriction on that dimension.
///
/// A row passes when all four predicates hold:
///
/// - `default_state`: the row's `current_default` is in the set
/// - `start_period` / `end_period`: `start <= report_period < end`
/// - `default_reasons`: the row has no reason, or its reason is in the set
/// - `product_types`: the row's product type is in the set
///
/// Rows without a default reason always pass the reason filter, so selecting
/// reasons never hides performing contracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Allowed values of `current_default`.
    #[serde(
        deserialize_with = "deserialize_flags",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_state: Option<BTreeSet<bool>>,

    /// Inclusive lower bound on the reporting period.
    #[serde(alias = "start_date", skip_serializing_if = "Option::is_none")]
    pub start_period: Option<ReportPeriod>,

    /// Exclusive upper bound on the reporting period.
    #[serde(alias = "end_date", skip_serializing_if = "Option::is_none")]
    pub end_period: Option<ReportPeriod>,

    /// Allowed default reasons.
    #[serde(alias = "checked_default_types", skip_serializing_if = "Option::is_none")]
    pub default_reasons: Option<BTreeSet<String>>,

    /// Allowed product types.
    #[serde(alias = "checked_loan_types", skip_serializing_if = "Option::is_none")]
    pub product_types: Option<BTreeSet<String>>,
}

impl FilterCriteria {
    /// Creates criteria with no restriction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `current_default` to the given flags.
    #[must_use]
    pub fn with_default_flags(mut self, flags: impl IntoIterator<Item = bool>) -> Self {
        self.default_state = Some(flags.into_iter().collect());
        self
    }

    /// Restricts `current_default` to the given dashboard states.
    #[must_use]
    pub fn with_default_states(self, states: impl IntoIterator<Item = DefaultState>) -> Self {
        self.with_default_flags(states.into_iter().map(DefaultState::flag))
    }

    /// Sets the inclusive lower period bound.
    #[must_use]
    pub fn with_start(mut self, start: ReportPeriod) -> Self {
        self.start_period = Some(start);
        self
    }

    /// Sets the exclusive upper period bound.
    #[must_use]
    pub fn with_end(mut self, end: ReportPeriod) -> Self {
        self.end_period = Some(end);
        self
    }

    /// Sets both period bounds.
    #[must_use]
    pub fn with_period_range(self, start: ReportPeriod, end: ReportPeriod) -> Self {
        self.with_start(start).with_end(end)
    }

    /// Restricts default reasons.
    #[must_use]
    pub fn with_default_reasons<S: Into<String>>(
        mut self,
        reasons: impl IntoIterator<Item = S>,
    ) -> Self {
        self.default_reasons = Some(reasons.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts product types.
    #[must_use]
    pub fn with_product_types<S: Into<String>>(
        mut self,
        products: impl IntoIterator<Item = S>,
    ) -> Self {
        self.product_types = Some(products.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if no dimension is restricted.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        active(&self.default_state).is_none()
            && self.start_period.is_none()
            && self.end_period.is_none()
            && active(&self.default_reasons).is_none()
            && active(&self.product_types).is_none()
    }

    /// Returns true if the row passes every predicate.
    #[must_use]
    pub fn matches(&self, row: &SnapshotRow) -> bool {
        self.matches_default_state(row)
            && self.matches_period(row)
            && self.matches_reason(row)
            && self.matches_product(row)
    }

    fn matches_default_state(&self, row: &SnapshotRow) -> bool {
        active(&self.default_state).map_or(true, |flags| flags.contains(&row.current_default))
    }

    fn matches_period(&self, row: &SnapshotRow) -> bool {
        self.start_period.map_or(true, |start| row.report_period >= start)
            && self.end_period.map_or(true, |end| row.report_period < end)
    }

    fn matches_reason(&self, row: &SnapshotRow) -> bool {
        match (active(&self.default_reasons), &row.default_reason) {
            (None, _) | (_, None) => true,
            (Some(reasons), Some(reason)) => reasons.contains(reason),
        }
    }

    fn matches_product(&self, row: &SnapshotRow) -> bool {
        active(&self.product_types).map_or(true, |products| products.contains(&row.product_type))
    }
}

/// An empty set behaves like an absent one.
fn active<T>(set: &Option<BTreeSet<T>>) -> Option<&BTreeSet<T>> {
    set.as_ref().filter(|s| !s.is_empty())
}

/// Accepts `[true, false]` as well as the `[1, 0]` form the dashboard sends.
fn deserialize_flags<'de, D>(deserializer: D) -> Result<Option<BTreeSet<bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u8),
    }

    let raw: Option<Vec<Flag>> = Option::deserialize(deserializer)?;
    raw.map(|flags| {
        flags
            .into_iter()
            .map(|flag| match flag {
                Flag::Bool(b) => Ok(b),
                Flag::Int(0) => Ok(false),
                Flag::Int(1) => Ok(true),
                Flag::Int(n) => Err(serde::de::Error::custom(format!(
                    "invalid default flag {n} (expected 0 or 1)"
                ))),
            })
            .collect::<Result<BTreeSet<bool>, D::Error>>()
    })
    .transpose()
}
