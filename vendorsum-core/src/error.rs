//! Error types for vendorsum-core

use thiserror::Error;

/// Main error type for the vendorsum-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error (connection, query or write failure)
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid file discovery pattern
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A row set or relation does not have the expected shape
    #[error("schema error: {0}")]
    Schema(String),

    /// A source relation does not exist in the database
    #[error("source relation not found: {0}")]
    MissingRelation(String),
}

/// Result type alias for vendorsum-core
pub type Result<T> = std::result::Result<T, Error>;
