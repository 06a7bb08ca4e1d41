//! Bulk importer: one CSV file per table, `INSERT OR IGNORE` semantics

use std::path::Path;
use serde::Serialize;
use crate::storage::Database;
use crate::{Error, Result};
use super::csv_source::{discover_csv_files, CsvTable};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Report CSV files without a matching table instead of failing
    pub skip_missing_tables: bool,
}

/// What happened to a single CSV file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported {
        table: String,
        /// Data rows read from the file
        rows: usize,
        /// Rows that were new to the table
        inserted: usize,
        columns: Vec<String>,
        skipped_columns: Vec<String>,
    },
    Empty {
        table: String,
    },
    NoMatchingColumns {
        table: String,
        skipped_columns: Vec<String>,
    },
    MissingTable {
        table: String,
    },
}

impl ImportOutcome {
    pub fn table(&self) -> &str {
        match self {
            ImportOutcome::Imported { table, .. }
            | ImportOutcome::Empty { table }
            | ImportOutcome::NoMatchingColumns { table, .. }
            | ImportOutcome::MissingTable { table } => table,
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            ImportOutcome::Imported { rows, .. } => *rows,
            _ => 0,
        }
    }

    pub fn inserted(&self) -> usize {
        match self {
            ImportOutcome::Imported { inserted, .. } => *inserted,
            _ => 0,
        }
    }
}

/// Progress notifications emitted by `import_dir`
#[derive(Debug, Clone, Copy)]
pub enum ImportEvent<'a> {
    Discovered { total: usize },
    Started { path: &'a Path, table: &'a str },
    Finished { outcome: &'a ImportOutcome },
}

/// Outcomes of a directory import, in file order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub outcomes: Vec<ImportOutcome>,
}

impl ImportReport {
    pub fn files(&self) -> usize {
        self.outcomes.len()
    }

    pub fn rows(&self) -> usize {
        self.outcomes.iter().map(ImportOutcome::rows).sum()
    }

    pub fn inserted(&self) -> usize {
        self.outcomes.iter().map(ImportOutcome::inserted).sum()
    }
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Import Statistics:")?;
        writeln!(f, "  Files: {}", self.files())?;
        writeln!(f, "  Rows read: {}", self.rows())?;
        writeln!(f, "  Rows inserted: {}", self.inserted())
    }
}

/// Import one CSV file into the table named after its stem.
///
/// Only CSV columns that exist in the table are written, in CSV header
/// order. The file is committed as one transaction.
pub fn import_file(
    db: &mut Database,
    path: &Path,
    options: ImportOptions,
) -> Result<ImportOutcome> {
    let csv = CsvTable::read(path)?;
    let table = csv.name.clone();

    if csv.is_empty() {
        tracing::debug!("{} has no data rows", path.display());
        return Ok(ImportOutcome::Empty { table });
    }

    if !db.table_exists(&table)? {
        if options.skip_missing_tables {
            tracing::warn!("No table named {} for {}", table, path.display());
            return Ok(ImportOutcome::MissingTable { table });
        }
        return Err(Error::TableNotFound(table));
    }
    let table_columns = db.table_columns(&table)?;

    let mut columns: Vec<String> = Vec::new();
    let mut skipped_columns: Vec<String> = Vec::new();
    for header in &csv.headers {
        if columns.contains(header) || skipped_columns.contains(header) {
            continue;
        }
        if table_columns.contains(header) {
            columns.push(header.clone());
        } else {
            skipped_columns.push(header.clone());
        }
    }

    if !skipped_columns.is_empty() {
        tracing::debug!("{}: ignoring columns {:?}", table, skipped_columns);
    }

    if columns.is_empty() {
        return Ok(ImportOutcome::NoMatchingColumns { table, skipped_columns });
    }

    let values = csv.column_values(&columns);
    let inserted = db.insert_rows(&table, &columns, &values)?;
    tracing::debug!("{}: {} of {} rows inserted", table, inserted, values.len());

    Ok(ImportOutcome::Imported {
        table,
        rows: values.len(),
        inserted,
        columns,
        skipped_columns,
    })
}

/// Import every `*.csv` in `dir`. Each file commits on its own, so files
/// handled before a failure stay imported.
pub fn import_dir<F>(
    db: &mut Database,
    dir: &Path,
    options: ImportOptions,
    mut observer: F,
) -> Result<ImportReport>
where
    F: FnMut(ImportEvent<'_>),
{
    let files = discover_csv_files(dir)?;
    tracing::info!("Found {} CSV file(s) in {}", files.len(), dir.display());
    observer(ImportEvent::Discovered { total: files.len() });

    let mut report = ImportReport::default();
    for path in &files {
        let table = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        observer(ImportEvent::Started { path, table: &table });

        let outcome = import_file(db, path, options)?;
        observer(ImportEvent::Finished { outcome: &outcome });
        report.outcomes.push(outcome);
    }

    Ok(report)
}
