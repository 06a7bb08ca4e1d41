//! SQLite storage implementation

use std::path::Path;
use rusqlite::{params_from_iter, Connection};
use serde::Serialize;
use crate::Result;
use crate::config::ensure_db_dir;

/// Handle on the application database
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database file (creates the file and its directory if missing)
    pub fn open(path: &Path) -> Result<Self> {
        ensure_db_dir(path)?;
        let conn = Connection::open(path)?;
        tracing::debug!("Opened database {}", path.display());
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Foreign keys stay off: CSV files load in name order, so a child
    /// table may be filled before its parent.
    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self { conn })
    }

    // ========== Schema Operations ==========

    /// Run a full SQL script and return the tables it created
    pub fn apply_schema(&self, sql: &str) -> Result<Vec<String>> {
        let before = self.list_tables()?;
        self.conn.execute_batch(sql)?;
        let created = self
            .list_tables()?
            .into_iter()
            .filter(|name| !before.contains(name))
            .collect();
        Ok(created)
    }

    /// Names of all tables, in catalogue order
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;

        let tables = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(tables)
    }

    /// Check whether a table exists
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Column names of a table in declaration order; empty if the table is missing
    pub fn table_columns(&self, name: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;

        let columns = stmt
            .query_map([name], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(columns)
    }

    /// Count rows in a table
    pub fn count_rows(&self, name: &str) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(name));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Table names with their row counts
    pub fn table_infos(&self) -> Result<Vec<TableInfo>> {
        self.list_tables()?
            .into_iter()
            .map(|name| {
                let rows = self.count_rows(&name)?;
                Ok(TableInfo { name, rows: Some(rows) })
            })
            .collect()
    }

    // ========== Bulk Operations ==========

    /// Insert rows with `INSERT OR IGNORE`, in a single transaction.
    ///
    /// Every row must hold one value per column. `None` is stored as NULL.
    /// Returns the number of rows actually inserted; rows rejected by a
    /// uniqueness constraint are not counted.
    pub fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Option<String>>],
    ) -> Result<usize> {
        let columns_sql = columns
            .iter()
            .map(|c| quote_identifier(c))
            .collect::<Vec<_>>()
            .join(",");
        let placeholders = vec!["?"; columns.len()].join(",");
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            columns_sql,
            placeholders
        );
        tracing::debug!("{}", sql);

        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                inserted += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        Ok(inserted)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        let tables = self.table_infos()?;
        Ok(DbStats {
            tables: tables.len(),
            rows: tables.iter().filter_map(|t| t.rows).sum(),
        })
    }
}

/// Quote an SQL identifier, doubling any embedded quote
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A table as shown by `appdb tables`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub tables: usize,
    pub rows: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Tables: {}", self.tables)?;
        writeln!(f, "  Rows: {}", self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        CREATE TABLE equipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL UNIQUE,
            ativo INTEGER DEFAULT 1
        );
        CREATE TABLE "tipo ""especial""" (codigo TEXT PRIMARY KEY);
    "#;

    fn row(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_apply_schema_reports_created_tables() {
        let db = Database::open_in_memory().unwrap();

        let mut created = db.apply_schema(SCHEMA).unwrap();
        created.sort();
        assert_eq!(created, vec!["equipes", "sqlite_sequence", "tipo \"especial\""]);

        // Re-applying an idempotent script creates nothing new
        let created = db
            .apply_schema("CREATE TABLE IF NOT EXISTS equipes (id INTEGER)")
            .unwrap();
        assert!(created.is_empty());
    }

    #[test]
    fn test_apply_schema_propagates_sql_errors() {
        let db = Database::open_in_memory().unwrap();
        db.apply_schema(SCHEMA).unwrap();

        assert!(db.apply_schema(SCHEMA).is_err());
        assert!(db.apply_schema("CREATE TABLE (").is_err());
    }

    #[test]
    fn test_list_tables_empty_database() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_tables().unwrap().is_empty());
    }

    #[test]
    fn test_table_columns() {
        let db = Database::open_in_memory().unwrap();
        db.apply_schema(SCHEMA).unwrap();

        assert_eq!(db.table_columns("equipes").unwrap(), vec!["id", "nome", "ativo"]);
        assert_eq!(db.table_columns("tipo \"especial\"").unwrap(), vec!["codigo"]);
        assert!(db.table_columns("missing").unwrap().is_empty());

        assert!(db.table_exists("equipes").unwrap());
        assert!(!db.table_exists("missing").unwrap());
    }

    #[test]
    fn test_insert_rows_ignores_duplicates_and_stores_null() {
        let mut db = Database::open_in_memory().unwrap();
        db.apply_schema(SCHEMA).unwrap();

        let columns = vec!["nome".to_string(), "ativo".to_string()];
        let rows = vec![
            row(&[Some("Alpha"), Some("1")]),
            row(&[Some("Beta"), None]),
            row(&[Some("Alpha"), Some("0")]),
        ];

        let inserted = db.insert_rows("equipes", &columns, &rows).unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(db.count_rows("equipes").unwrap(), 2);

        let ativo: Option<String> = db
            .conn
            .query_row("SELECT ativo FROM equipes WHERE nome = 'Beta'", [], |r| r.get(0))
            .unwrap();
        assert!(ativo.is_none());

        // Second pass is a no-op
        assert_eq!(db.insert_rows("equipes", &columns, &rows).unwrap(), 0);
    }

    #[test]
    fn test_insert_rows_quoted_table() {
        let mut db = Database::open_in_memory().unwrap();
        db.apply_schema(SCHEMA).unwrap();

        let columns = vec!["codigo".to_string()];
        let inserted = db
            .insert_rows("tipo \"especial\"", &columns, &[row(&[Some("X1")])])
            .unwrap();
        assert_eq!(inserted, 1);
    }

    #[test]
    fn test_stats() {
        let mut db = Database::open_in_memory().unwrap();
        db.apply_schema(SCHEMA).unwrap();
        let columns = vec!["nome".to_string()];
        db.insert_rows("equipes", &columns, &[row(&[Some("Alpha")]), row(&[Some("Beta")])])
            .unwrap();

        let stats = db.stats().unwrap();
        // sqlite_sequence holds one row for equipes
        assert_eq!(stats.tables, 3);
        assert_eq!(stats.rows, 3);
        assert!(stats.to_string().contains("Tables: 3"));
    }

    #[test]
    fn test_insert_child_row_before_parent() {
        let mut db = Database::open_in_memory().unwrap();
        db.apply_schema(
            "CREATE TABLE pais (id INTEGER PRIMARY KEY);\n\
             CREATE TABLE filhos (id INTEGER PRIMARY KEY, pai_id INTEGER REFERENCES pais(id));",
        )
        .unwrap();

        let fk: i64 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(fk, 0);

        let columns = vec!["id".to_string(), "pai_id".to_string()];
        let inserted = db
            .insert_rows("filhos", &columns, &[row(&[Some("1"), Some("7")])])
            .unwrap();
        assert_eq!(inserted, 1);

        let columns = vec!["id".to_string()];
        assert_eq!(db.insert_rows("pais", &columns, &[row(&[Some("7")])]).unwrap(), 1);
    }

    #[test]
    fn test_file_database_has_foreign_keys_off() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("app.db")).unwrap();
        let fk: i64 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
            .unwrap();
        assert_eq!(fk, 0);
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("equipes"), "\"equipes\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }
}
