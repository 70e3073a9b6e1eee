//! vendorsum-ingest - CLI tool to bulk-load CSV files into the database
//!
//! Every `*.csv` file in the data directory becomes a table named after the
//! file (extension stripped), replacing any previous table of that name.
//! A file that fails to parse or load is logged and skipped.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/vendorsum/inventory.db (~/.local/share/vendorsum/inventory.db)
//! - Logs: $XDG_STATE_HOME/vendorsum/ingestion_db.log (~/.local/state/vendorsum/ingestion_db.log)
//! - Config: $XDG_CONFIG_HOME/vendorsum/config.toml (~/.config/vendorsum/config.toml)

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use vendorsum_core::format::format_minutes;
use vendorsum_core::logging::{self, INGEST_LOG_FILE};
use vendorsum_core::{ingest, Config, Database, FileStatus};

#[derive(Parser)]
#[command(name = "vendorsum-ingest")]
#[command(about = "Load every CSV file in a directory into the inventory database")]
#[command(version)]
struct Args {
    /// SQLite database to load into
    #[arg(long, env = "VENDORSUM_DATABASE")]
    database: Option<PathBuf>,

    /// Directory containing the CSV files (defaults to ingest.data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        logging::init(&config.logging, INGEST_LOG_FILE).context("failed to initialize logging")?;

    let result = run(&args, &config);
    if let Err(e) = &result {
        tracing::error!(error = %format!("{:#}", e), "Ingestion aborted");
    }
    result
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let db_path = config.resolve_database_path(args.database.as_deref());
    let data_dir = args
        .data_dir
        .clone()
        .unwrap_or_else(|| config.ingest.data_dir.clone());

    tracing::info!(path = %db_path.display(), "Opening database");
    let mut db = Database::open(&db_path).context("failed to open database")?;

    println!("Database: {}", db_path.display());
    println!("Data directory: {}", data_dir.display());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = ingest::bulk_load_directory_with_progress(
        &mut db,
        &data_dir,
        config.ingest.batch_size,
        |current, total, path| {
            if current == 0 {
                pb.set_length(total as u64);
            }
            pb.set_position(current as u64);
            pb.set_message(
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("...")
                    .to_string(),
            );
        },
    )
    .with_context(|| format!("failed to scan {}", data_dir.display()))?;

    pb.finish_and_clear();

    println!("\nIngestion complete:");
    for outcome in &report.outcomes {
        match &outcome.status {
            FileStatus::Loaded { rows } => {
                println!("  ✓ {} → {} ({} rows)", outcome.path.display(), outcome.table, rows);
            }
            FileStatus::Failed { error } => {
                println!("  ✗ {}: {}", outcome.path.display(), error);
            }
        }
    }
    println!(
        "  Files loaded: {}/{}",
        report.loaded_count(),
        report.outcomes.len()
    );
    println!("  Rows loaded:  {}", report.total_rows());
    println!("  Total time:   {}", format_minutes(report.elapsed));

    Ok(())
}
