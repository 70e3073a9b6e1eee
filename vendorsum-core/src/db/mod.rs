//! Database layer for vendorsum
//!
//! This module provides the storage layer using SQLite with:
//! - Source relation checks for the summary query
//! - Row set reads and full-replace table writes

pub mod repo;
pub mod schema;

pub use repo::{quote_identifier, Database};
