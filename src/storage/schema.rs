//! Schema file handling and database initialization

use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::{Error, Result};
use super::sqlite::Database;

/// Outcome of `init_database`
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub database: PathBuf,
    /// Tables that did not exist before the schema ran
    pub created_tables: Vec<String>,
    /// Every table present afterwards
    pub tables: Vec<String>,
}

/// Read a schema file as UTF-8
pub fn read_schema(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::SchemaNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Create (or update) the database at `db_path` from the script at `schema_path`.
///
/// The schema is read before the database file is touched, so a missing
/// schema never leaves an empty database behind.
pub fn init_database(db_path: &Path, schema_path: &Path) -> Result<InitReport> {
    let sql = read_schema(schema_path)?;
    tracing::info!("Applying schema {} to {}", schema_path.display(), db_path.display());

    let db = Database::open(db_path)?;
    let created_tables = db.apply_schema(&sql)?;
    let tables = db.list_tables()?;
    tracing::debug!("Created {} table(s)", created_tables.len());

    Ok(InitReport {
        database: db_path.to_path_buf(),
        created_tables,
        tables,
    })
}
