//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{FilterArgs, SeriesArgs};

/// Loanwatch - Loan portfolio default monitoring CLI
#[derive(Parser)]
#[command(name = "loanwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snapshot table file (csv, tsv, txt or json)
    #[arg(
        short,
        long,
        env = "LOANWATCH_DATA",
        default_value = "data/portfolio.csv",
        global = true
    )]
    pub data: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress section headers
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List product types, default reasons and the observation period
    Catalog,

    /// Contract count, defaults count and forward default rate
    Stats(FilterArgs),

    /// Contract counts per reporting period
    Counts(SeriesArgs),

    /// Contract counts per rating
    Ratings(FilterArgs),

    /// Forward default rate per reporting period
    DefaultRate(SeriesArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}
