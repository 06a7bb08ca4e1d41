//! Storage Layer - SQLite-backed application database
//!
//! The schema itself is owned by an external SQL file; this layer only
//! applies it, reads the catalogue back and loads rows.

pub mod schema;
pub mod sqlite;

pub use schema::{init_database, read_schema, InitReport};
pub use sqlite::{quote_identifier, Database, DbStats, TableInfo};
