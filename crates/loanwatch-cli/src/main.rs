//! Loanwatch CLI - Command-line queries against a loan portfolio snapshot.
//!
//! # Usage
//!
//! ```bash
//! # What is in the table
//! loanwatch --data portfolio.csv catalog
//!
//! # Statistic cards for two products
//! loanwatch stats --product Overdraft --product Mortgage
//!
//! # Contracts per period, one column per product
//! loanwatch counts --decompose --from 2019-01-01 --to 2020-01-01
//!
//! # Default rate of performing contracts as JSON
//! loanwatch --format json default-rate --state healthy
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let format = cli.format;
    let data = cli.data.as_path();
    let quiet = cli.quiet;

    // Execute command
    match cli.command {
        Commands::Catalog => commands::catalog::execute(data, format, quiet)?,
        Commands::Stats(args) => commands::stats::execute(args, data, format, quiet)?,
        Commands::Counts(args) => commands::counts::execute(args, data, format, quiet)?,
        Commands::Ratings(args) => commands::ratings::execute(args, data, format, quiet)?,
        Commands::DefaultRate(args) => {
            commands::default_rate::execute(args, data, format, quiet)?
        }
    }

    Ok(())
}
