//! CLI command implementations.

pub mod catalog;
pub mod counts;
pub mod default_rate;
pub mod ratings;
pub mod stats;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::debug;

use loanwatch_ext_file::open_snapshot_source;
use loanwatch_portfolio::{DefaultState, FilterCriteria, FilterEngine, PortfolioStore, ReportPeriod};

use crate::error::{CliError, CliResult};

/// Filter flags shared by the query commands.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// First reporting date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Reporting date to stop before (YYYY-MM-DD, exclusive)
    #[arg(long)]
    pub to: Option<String>,

    /// Product type to include (repeatable)
    #[arg(long = "product", value_name = "PRODUCT")]
    pub products: Vec<String>,

    /// Default reason to include (repeatable); contracts without a reason
    /// are always kept
    #[arg(long = "reason", value_name = "REASON")]
    pub reasons: Vec<String>,

    /// Default state to include: defaulted or healthy (repeatable)
    #[arg(long = "state", value_name = "STATE")]
    pub states: Vec<DefaultState>,
}

impl FilterArgs {
    /// Builds filter criteria. Flags that were not given leave their
    /// dimension unrestricted.
    pub fn to_criteria(&self) -> CliResult<FilterCriteria> {
        let mut criteria = FilterCriteria::new();

        if let Some(from) = &self.from {
            criteria = criteria.with_start(parse_date(from)?);
        }
        if let Some(to) = &self.to {
            criteria = criteria.with_end(parse_date(to)?);
        }
        if !self.products.is_empty() {
            criteria = criteria.with_product_types(non_empty("product", &self.products)?);
        }
        if !self.reasons.is_empty() {
            criteria = criteria.with_default_reasons(non_empty("reason", &self.reasons)?);
        }
        if !self.states.is_empty() {
            criteria = criteria.with_default_states(self.states.iter().copied());
        }

        Ok(criteria)
    }
}

/// Filter flags plus the product breakdown switch.
#[derive(Args, Debug, Clone, Default)]
pub struct SeriesArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Break each period down by product type
    #[arg(long)]
    pub decompose: bool,
}

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<ReportPeriod> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map(ReportPeriod::new)
        .map_err(|_| CliError::InvalidDate(s.to_string()))
}

fn non_empty<'a>(flag: &'static str, values: &'a [String]) -> CliResult<Vec<&'a str>> {
    values
        .iter()
        .map(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Err(CliError::InvalidFilter {
                    flag,
                    value: v.clone(),
                })
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}

/// Loads the snapshot file and builds an engine over it.
pub fn load_engine(data: &Path) -> Result<FilterEngine> {
    let source = open_snapshot_source(data)
        .with_context(|| format!("cannot read snapshot file {}", data.display()))?;
    let store = PortfolioStore::load(&*source)
        .with_context(|| format!("cannot load snapshot file {}", data.display()))?;

    debug!(rows = store.len(), "snapshot table ready");

    Ok(FilterEngine::new(Arc::new(store)))
}

/// Product column text for a series point.
pub(crate) fn product_label(product: Option<&str>) -> String {
    product.unwrap_or("all").to_string()
}
