//! Default-rate command implementation.
//!
//! Share of contracts defaulting within twelve months, per reporting period.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{load_engine, product_label, SeriesArgs};
use crate::output::{format_percent, print_header, print_json_value, print_output};

#[derive(Debug, Serialize, Tabled)]
struct RateRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Default rate")]
    #[serde(skip)]
    display: String,
    #[tabled(skip)]
    default_rate: f64,
}

/// Execute the default-rate command.
pub fn execute(args: SeriesArgs, data: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let criteria = args.filter.to_criteria()?;
    let engine = load_engine(data)?;
    let series = engine.default_rate_by_period(&criteria, args.decompose)?;

    if format == OutputFormat::Json {
        return print_json_value(&series);
    }

    let rows: Vec<RateRow> = series
        .iter()
        .map(|point| RateRow {
            period: point.period.to_string(),
            product: product_label(point.product_type.as_deref()),
            display: format_percent(point.value),
            default_rate: point.value,
        })
        .collect();

    if format == OutputFormat::Table && !quiet {
        print_header("Default Rate per Period");
    }
    print_output(&rows, format)
}
