//! Counts command implementation.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{load_engine, product_label, SeriesArgs};
use crate::output::{print_header, print_json_value, print_output};

#[derive(Debug, Serialize, Tabled)]
struct CountRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Contracts")]
    count: usize,
}

/// Execute the counts command.
pub fn execute(args: SeriesArgs, data: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let criteria = args.filter.to_criteria()?;
    let engine = load_engine(data)?;
    let series = engine.counts_by_period(&criteria, args.decompose)?;

    if format == OutputFormat::Json {
        return print_json_value(&series);
    }

    let rows: Vec<CountRow> = series
        .iter()
        .map(|point| CountRow {
            period: point.period.to_string(),
            product: product_label(point.product_type.as_deref()),
            count: point.value,
        })
        .collect();

    if format == OutputFormat::Table && !quiet {
        print_header("Contracts per Period");
    }
    print_output(&rows, format)
}
