//! Snapshot row: one contract observed at one reporting period.

use serde::{Deserialize, Serialize};

use super::ReportPeriod;

/// One (contract, reporting period) observation of the loan portfolio.
///
/// The same contract reappears once per period it was outstanding, so
/// `contract_id` is not unique across the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Snapshot date.
    pub report_period: ReportPeriod,

    /// Loan product type.
    pub product_type: String,

    /// Whether the contract is in default as of this period.
    pub current_default: bool,

    /// Whether the contract defaults within the forward horizon.
    pub forward_default: bool,

    /// Reason of the current default. Present only for defaulted rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_reason: Option<String>,

    /// Credit rating bucket.
    pub rating: i32,

    /// Contract identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
}

impl SnapshotRow {
    /// Creates a performing (non-defaulted) row.
    #[must_use]
    pub fn new(report_period: ReportPeriod, product_type: impl Into<String>, rating: i32) -> Self {
        Self {
            report_period,
            product_type: product_type.into(),
            current_default: false,
            forward_default: false,
            default_reason: None,
            rating,
            contract_id: None,
        }
    }

    /// Marks the row as currently defaulted with an optional reason.
    #[must_use]
    pub fn defaulted(mut self, reason: Option<&str>) -> Self {
        self.current_default = true;
        self.default_reason = reason.map(str::to_string);
        self
    }

    /// Sets the forward default flag.
    #[must_use]
    pub fn with_forward_default(mut self, flag: bool) -> Self {
        self.forward_default = flag;
        self
    }

    /// Sets the contract identifier.
    #[must_use]
    pub fn with_contract_id(mut self, id: impl Into<String>) -> Self {
        self.contract_id = Some(id.into());
        self
    }

    /// Returns true if the row carries a reason without being in default.
    #[must_use]
    pub fn has_orphan_reason(&self) -> bool {
        self.default_reason.is_some() && !self.current_default
    }

    /// Forward default flag as 0.0 / 1.0, for rate aggregation.
    #[must_use]
    pub fn forward_default_value(&self) -> f64 {
        if self.forward_default {
            1.0
        } else {
            0.0
        }
    }
}
