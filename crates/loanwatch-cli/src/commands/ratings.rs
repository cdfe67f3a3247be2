//! Ratings command implementation.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::commands::{load_engine, FilterArgs};
use crate::output::{format_percent, print_header, print_json_value, print_output};

#[derive(Debug, Serialize, Tabled)]
struct RatingRow {
    #[tabled(rename = "Rating")]
    rating: i32,
    #[tabled(rename = "Contracts")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
}

/// Execute the ratings command.
pub fn execute(args: FilterArgs, data: &Path, format: OutputFormat, quiet: bool) -> Result<()> {
    let criteria = args.to_criteria()?;
    let engine = load_engine(data)?;
    let distribution = engine.rating_histogram(&criteria)?;

    if format == OutputFormat::Json {
        return print_json_value(&distribution);
    }

    let rows: Vec<RatingRow> = distribution
        .sorted_by_rating()
        .into_iter()
        .map(|(rating, count)| RatingRow {
            rating,
            count,
            share: distribution
                .share(rating)
                .map_or_else(|| "n/a".to_string(), format_percent),
        })
        .collect();

    if format == OutputFormat::Table && !quiet {
        print_header("Contracts per Rating");
    }
    print_output(&rows, format)?;

    if format == OutputFormat::Table && !quiet {
        if let Some(average) = distribution.average_rating() {
            println!("Average rating: {average:.2}");
        }
    }

    Ok(())
}
