//! Catalog command implementation.
//!
//! Shows what the selection widgets of the dashboard would offer.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::load_engine;
use crate::output::{print_header, print_json_value, print_output, KeyValue};

/// One catalog entry, for table and CSV output.
#[derive(Debug, Serialize, Tabled)]
struct CatalogEntry {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Execute the catalog command.
pub fn execute(data: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let engine = load_engine(data)?;
    let catalog = engine.store().catalog();

    match format {
        OutputFormat::Json => {
            let default_selection = catalog.default_selection();
            print_json_value(&json!({
                "product_types": catalog.product_types,
                "default_reasons": catalog.default_reasons,
                "date_bounds": catalog.date_bounds,
                "row_count": catalog.row_count,
                "default_selection": default_selection,
            }))?;
        }
        OutputFormat::Table => {
            let (from, to) = catalog.date_bounds.map_or_else(
                || ("-".to_string(), "-".to_string()),
                |b| (b.start.to_string(), b.end.to_string()),
            );
            let overview = vec![
                KeyValue::new("Rows", catalog.row_count.to_string()),
                KeyValue::new("First period", from),
                KeyValue::new("Last period", to),
            ];

            if !quiet {
                print_header("Snapshot Table");
            }
            print_output(&overview, format)?;

            let entries = entries(&catalog.product_types, &catalog.default_reasons);
            if !quiet {
                print_header("Catalog");
            }
            print_output(&entries, format)?;
        }
        OutputFormat::Csv => {
            let entries = entries(&catalog.product_types, &catalog.default_reasons);
            print_output(&entries, format)?;
        }
    }

    Ok(())
}

fn entries(products: &[String], reasons: &[String]) -> Vec<CatalogEntry> {
    products
        .iter()
        .map(|p| CatalogEntry {
            kind: "product_type",
            value: p.clone(),
        })
        .chain(reasons.iter().map(|r| CatalogEntry {
            kind: "default_reason",
            value: r.clone(),
        }))
        .collect()
}
