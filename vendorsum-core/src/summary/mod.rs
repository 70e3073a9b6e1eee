//! Vendor sales summary pipeline
//!
//! Three steps, each a function of its input plus the database handle:
//!
//! 1. [`fetch_vendor_summary`]: aggregate purchases, sales and freight per
//!    (vendor, brand)
//! 2. [`enrich`]: normalize types and derive gross profit, profit margin,
//!    stock turnover and sales-to-purchase ratio
//! 3. [`persist`](crate::ingest::persist): replace the destination table
//!
//! The read and the write are independent operations. A failure after the
//! query leaves the destination table as it was.

mod enrich;
mod query;

pub use enrich::enrich;
pub use query::{fetch_vendor_summary, VENDOR_SUMMARY_SQL};

use crate::config::SummaryConfig;
use crate::db::Database;
use crate::error::Result;
use crate::ingest::persist;
use crate::types::VendorSummary;

/// Result of one summary run.
#[derive(Debug, Clone)]
pub struct SummaryReport {
    /// Table the rows were written to
    pub destination: String,
    /// Enriched rows, ordered by purchase dollars descending
    pub rows: Vec<VendorSummary>,
}

impl SummaryReport {
    /// Sum of gross profit across all rows
    pub fn total_gross_profit(&self) -> f64 {
        self.rows.iter().map(|r| r.gross_profit).sum()
    }
}

/// Compute the vendor summary and replace the destination table with it.
pub fn run(db: &mut Database, config: &SummaryConfig, batch_size: usize) -> Result<SummaryReport> {
    tracing::info!("Starting vendor summary generation");

    let aggregated = fetch_vendor_summary(db)?;
    tracing::info!(rows = aggregated.len(), "Vendor summary data fetched successfully");

    let rows = enrich(&aggregated, config.ratio_policy)?;
    tracing::info!(
        rows = rows.len(),
        ratio_policy = ?config.ratio_policy,
        "Vendor summary data cleaned successfully"
    );

    let written = persist(db, &VendorSummary::to_table(&rows), &config.table, batch_size)?;
    tracing::info!(
        table = %config.table,
        rows = written,
        "Vendor summary data ingested into database successfully"
    );

    Ok(SummaryReport {
        destination: config.table.clone(),
        rows,
    })
}
