//! Loader: persisting row sets and bulk-loading CSV directories
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────────┐     ┌─────────────────┐
//! │   data/*.csv    │ ──► │ bulk_load_directory  │ ──► │    Database     │
//! │                 │     │  (one file at a time) │     │ (table per file)│
//! └─────────────────┘     └──────────────────────┘     └─────────────────┘
//!                               │
//!                               ▼
//!                    ┌──────────────────────┐
//!                    │ parser::read_csv     │
//!                    │ persist (replace)    │
//!                    └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vendorsum_core::{ingest, Database};
//!
//! let mut db = Database::open(&path)?;
//! let report = ingest::bulk_load_directory(&mut db, Path::new("data"), 50_000)?;
//! println!("Loaded {} of {} files", report.loaded_count(), report.outcomes.len());
//! ```

pub mod parser;

pub use parser::{read_csv, read_csv_file};

use crate::db::Database;
use crate::error::Result;
use crate::types::Table;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Outcome of loading a single CSV file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// The file was persisted as a table with this many rows
    Loaded { rows: usize },
    /// Parsing or persisting failed; the batch continued
    Failed { error: String },
}

/// Result of loading one file from the ingestion directory.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Path of the CSV file
    pub path: PathBuf,
    /// Destination table (file name without extension)
    pub table: String,
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, FileStatus::Loaded { .. })
    }
}

/// Result of a directory bulk load.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// When the batch started
    pub started_at: DateTime<Utc>,
    /// Wall-clock time spent on the whole batch
    pub elapsed: Duration,
    /// One outcome per discovered CSV file, in processing order
    pub outcomes: Vec<FileOutcome>,
}

impl IngestReport {
    /// Number of files persisted successfully
    pub fn loaded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_loaded()).count()
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_loaded())
    }

    /// Total rows persisted across all loaded files
    pub fn total_rows(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.status {
                FileStatus::Loaded { rows } => rows,
                FileStatus::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Replace table `destination` with `rows`, inserting at most `batch_size`
/// rows per statement. Returns the number of rows written.
pub fn persist(
    db: &mut Database,
    rows: &Table,
    destination: &str,
    batch_size: usize,
) -> Result<usize> {
    db.replace_table(destination, rows, batch_size)
}

/// Find the `*.csv` files directly inside `dir`, sorted by file name.
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("ingestion directory not found: {}", dir.display()),
        )
        .into());
    }

    let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy())).join("*.csv");

    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %e.path().display(), error = %e, "Unreadable directory entry");
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Table name for a CSV file: its file name with the extension stripped.
pub fn table_name_for(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load every CSV file in `dir` as its own table.
///
/// Files are processed one at a time. A failure on one file is logged and
/// recorded in the report; the remaining files are still loaded. Only a
/// missing or unreadable directory fails the whole call.
pub fn bulk_load_directory(db: &mut Database, dir: &Path, batch_size: usize) -> Result<IngestReport> {
    bulk_load_directory_with_progress(db, dir, batch_size, |_, _, _| {})
}

/// Load every CSV file in `dir`, with a progress callback.
///
/// The callback receives `(current_file_index, total_files, file_path)` before
/// each file is processed.
pub fn bulk_load_directory_with_progress<F>(
    db: &mut Database,
    dir: &Path,
    batch_size: usize,
    mut on_progress: F,
) -> Result<IngestReport>
where
    F: FnMut(usize, usize, &Path),
{
    let started_at = Utc::now();
    let start = Instant::now();

    let files = discover_csv_files(dir)?;
    let total = files.len();
    tracing::info!(dir = %dir.display(), count = total, "Discovered CSV files");

    let mut outcomes = Vec::with_capacity(total);
    for (i, path) in files.into_iter().enumerate() {
        on_progress(i, total, &path);

        let table = table_name_for(&path);
        tracing::info!(file = %path.display(), table = %table, "Ingesting file into db");

        let status = match load_file(db, &path, &table, batch_size) {
            Ok(rows) => {
                tracing::info!(file = %path.display(), table = %table, rows, "Successfully ingested file");
                FileStatus::Loaded { rows }
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Failed to ingest file");
                FileStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        outcomes.push(FileOutcome {
            path,
            table,
            status,
        });
    }

    let elapsed = start.elapsed();
    tracing::info!("----------Ingestion completed----------");
    tracing::info!(
        loaded = outcomes.iter().filter(|o| o.is_loaded()).count(),
        failed = outcomes.iter().filter(|o| !o.is_loaded()).count(),
        "Total time for ingestion: {}",
        crate::format::format_minutes(elapsed)
    );

    Ok(IngestReport {
        started_at,
        elapsed,
        outcomes,
    })
}

fn load_file(db: &mut Database, path: &Path, table: &str, batch_size: usize) -> Result<usize> {
    let rows = read_csv_file(path)?;
    persist(db, &rows, table, batch_size)
}
