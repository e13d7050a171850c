//! Storedash CLI - migrations, demo data and reports.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sd-cli migrate
//!
//! # Replace the database contents with demo data
//! sd-cli seed
//!
//! # Seed only an empty database
//! sd-cli seed --keep
//!
//! # Print the dashboard summary from a running server
//! sd-cli report --url http://127.0.0.1:8000 --store 1 --time-range week
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use storedash_core::StoreId;
use storedash_core::reports::TimeRange;

mod commands;

#[derive(Parser)]
#[command(name = "sd-cli")]
#[command(author, version, about = "Storedash CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load demo data into the database
    Seed {
        /// Leave a non-empty database untouched
        #[arg(long)]
        keep: bool,
    },
    /// Print the analytics summary from a running server
    Report {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        url: String,

        /// Limit the report to one store
        #[arg(long)]
        store: Option<i32>,

        /// Chart window (`week`, `month`, `year`)
        #[arg(long, default_value = "month")]
        time_range: TimeRange,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { keep } => commands::seed::demo_data(keep).await?,
        Commands::Report {
            url,
            store,
            time_range,
        } => {
            if let Err(e) = commands::report::print(&url, store.map(StoreId::new), time_range).await
            {
                return Err(e.friendly_message("Failed to load analytics").into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_args() {
        let cli = Cli::try_parse_from(["sd-cli", "report", "--store", "2", "--time-range", "year"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Report {
                url,
                store,
                time_range,
            } => {
                assert_eq!(url, "http://127.0.0.1:8000");
                assert_eq!(store, Some(2));
                assert_eq!(time_range, TimeRange::Year);
            }
            _ => panic!("expected report"),
        }
    }
}
