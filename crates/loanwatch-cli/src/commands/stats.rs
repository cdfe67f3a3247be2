//! Stats command implementation.
//!
//! Prints the three statistic cards: contract count, contracts in default
//! and forward default rate.

use std::path::Path;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::commands::{load_engine, FilterArgs};
use crate::output::{format_percent, print_header, print_json_value, print_output, print_warning, KeyValue};

/// Execute the stats command.
pub fn execute(args: FilterArgs, data: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let criteria = args.to_criteria()?;
    let engine = load_engine(data)?;
    let summary = engine.summary(&criteria)?;

    if summary.count == 0 && !quiet {
        print_warning("No contracts match the selection.");
    }

    match format {
        OutputFormat::Json => print_json_value(&summary)?,
        OutputFormat::Table => {
            let results = vec![
                KeyValue::new("Contracts", summary.count.to_string()),
                KeyValue::new("In default", summary.defaults_count.to_string()),
                KeyValue::new("Defaulting within 12m", summary.forward_defaults.to_string()),
                KeyValue::new(
                    "Event rate",
                    summary
                        .event_rate
                        .map_or_else(|| "n/a".to_string(), format_percent),
                ),
            ];

            if !quiet {
                print_header("Portfolio Statistics");
            }
            print_output(&results, format)?;
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.serialize(summary)?;
            wtr.flush()?;
        }
    }

    Ok(())
}
