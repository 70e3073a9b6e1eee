//! # vendorsum-core
//!
//! Core library for vendorsum - a vendor sales/purchase summary ETL.
//!
//! This library provides:
//! - Row set types and the vendor summary row
//! - Database storage layer with SQLite
//! - CSV directory loading (one table per file)
//! - The vendor summary query and its derived ratios
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Pipeline
//!
//! - **Load:** `data/*.csv` → one table per file (full replace)
//! - **Aggregate:** purchases, price reference, sales and freight → one row per (vendor, brand)
//! - **Enrich:** fill nulls, derive ratios, write `vendor_sales_summary` (full replace)
//!
//! ## Example
//!
//! ```rust,no_run
//! use vendorsum_core::{summary, Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let mut db = Database::open(&config.resolve_database_path(None)).expect("failed to open database");
//! let report = summary::run(&mut db, &config.summary, config.ingest.batch_size)
//!     .expect("summary failed");
//! println!("wrote {} rows to {}", report.rows.len(), report.destination);
//! ```

// Re-export commonly used items at the crate root
pub use config::{Config, RatioPolicy};
pub use db::Database;
pub use error::{Error, Result};
pub use ingest::{FileOutcome, FileStatus, IngestReport};
pub use summary::SummaryReport;
pub use types::*;

// Public modules
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod ingest;
pub mod logging;
pub mod summary;
pub mod types;
