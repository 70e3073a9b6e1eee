//! vendorsum-summary - CLI tool to build the vendor sales summary table
//!
//! Aggregates purchases, sales and freight per (vendor, brand), derives
//! profit ratios and replaces the summary table with the result.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/vendorsum/inventory.db (~/.local/share/vendorsum/inventory.db)
//! - Logs: $XDG_STATE_HOME/vendorsum/vendor_summary.log (~/.local/state/vendorsum/vendor_summary.log)
//! - Config: $XDG_CONFIG_HOME/vendorsum/config.toml (~/.config/vendorsum/config.toml)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vendorsum_core::format::{format_dollars, format_identifier, format_percent};
use vendorsum_core::logging::{self, SUMMARY_LOG_FILE};
use vendorsum_core::{summary, Config, Database};

/// Rows shown in the console preview
const PREVIEW_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "vendorsum-summary")]
#[command(about = "Build the vendor sales summary table")]
#[command(version)]
struct Args {
    /// SQLite database holding the source tables
    #[arg(long, env = "VENDORSUM_DATABASE")]
    database: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        logging::init(&config.logging, SUMMARY_LOG_FILE).context("failed to initialize logging")?;

    let result = run(&args, &config);
    if let Err(e) = &result {
        tracing::error!(
            error = %format!("{:#}", e),
            "Failed to generate or ingest vendor summary"
        );
    }
    result
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let db_path = config.resolve_database_path(args.database.as_deref());

    tracing::info!(path = %db_path.display(), "Opening database");
    let mut db = Database::open(&db_path).context("failed to open database")?;

    let report = summary::run(&mut db, &config.summary, config.ingest.batch_size)
        .context("vendor summary failed")?;

    println!("Database: {}", db_path.display());
    println!(
        "Wrote {} row(s) to {}",
        report.rows.len(),
        report.destination
    );
    println!(
        "Total gross profit: {}",
        format_dollars(report.total_gross_profit())
    );

    if !report.rows.is_empty() {
        println!("\nTop vendors by purchase dollars:");
        for row in report.rows.iter().take(PREVIEW_ROWS) {
            println!(
                "  {:<30} brand {:<8} purchased {:>14}  sold {:>14}  margin {:>9}",
                row.vendor_name,
                format_identifier(&row.brand),
                format_dollars(row.total_purchase_dollars),
                format_dollars(row.total_sales_dollars),
                format_percent(row.profit_margin),
            );
        }
    }

    Ok(())
}
