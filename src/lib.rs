//! # appdb - local SQLite application database tooling
//!
//! appdb provides:
//! - Database initialization from an external SQL schema file
//! - Table listing straight from the SQLite catalogue
//! - Bulk CSV import into tables matched by file name, skipping duplicate
//!   rows and columns the table does not have

pub mod config;
pub mod import;
pub mod output;
pub mod storage;
pub mod ui;

use std::path::PathBuf;

// Re-exports for convenient access
pub use config::{AppdbConfig, ResolvedPaths};
pub use import::{CsvTable, ImportOptions, ImportOutcome, ImportReport};
pub use storage::{Database, DbStats, InitReport};

/// Result type alias for appdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for appdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("Config already exists at {0} (use --force to overwrite)")]
    ConfigExists(PathBuf),

    #[error("Schema file not found: {0}")]
    SchemaNotFound(PathBuf),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Table not found: {0}")]
    TableNotFound(String),
}
