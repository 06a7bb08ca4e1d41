//! CSV file discovery and parsing

use std::path::{Path, PathBuf};
use csv::{ReaderBuilder, Trim};
use crate::{Error, Result};

/// Find `*.csv` files directly inside `dir`, sorted by path
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }

    let pattern = format!("{}/*.csv", glob::Pattern::escape(&dir.to_string_lossy()));

    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    Ok(files)
}

/// A CSV file loaded in memory, keyed by its header row.
///
/// Empty fields are held as `None` so they land in the database as NULL.
#[derive(Debug, Clone)]
pub struct CsvTable {
    /// Target table name (file stem)
    pub name: String,
    pub path: PathBuf,
    pub headers: Vec<String>,
    /// One entry per header in every row
    pub rows: Vec<Vec<Option<String>>>,
}

impl CsvTable {
    /// Read a CSV file from disk
    pub fn read(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let content = std::fs::read(path)?;
        let mut table = Self::parse(&name, content.as_slice())?;
        table.path = path.to_path_buf();
        Ok(table)
    }

    /// Parse CSV content for the table `name`
    pub fn parse<R: std::io::Read>(name: &str, reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .trim(Trim::None)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = (0..headers.len())
                .map(|i| match record.get(i) {
                    Some("") | None => None,
                    Some(value) => Some(value.to_string()),
                })
                .collect();
            rows.push(row);
        }

        Ok(Self {
            name: name.to_string(),
            path: PathBuf::new(),
            headers,
            rows,
        })
    }

    /// True when the file has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Project every row onto `columns`, which must all be headers.
    ///
    /// With duplicated header names the last occurrence wins.
    pub fn column_values(&self, columns: &[String]) -> Vec<Vec<Option<String>>> {
        let indices: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.headers.iter().rposition(|h| h == c))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.and_then(|i| row[i].clone()))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_fields_become_none() {
        let data = "id,nome,obs\n1,Alpha,\n2,,  \n";
        let table = CsvTable::parse("equipes", data.as_bytes()).unwrap();

        assert_eq!(table.name, "equipes");
        assert_eq!(table.headers, vec!["id", "nome", "obs"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec![Some("1".into()), Some("Alpha".into()), None]);
        // whitespace is kept as-is
        assert_eq!(table.rows[1], vec![Some("2".into()), None, Some("  ".into())]);
    }

    #[test]
    fn test_parse_ragged_records() {
        let data = "a,b,c\n1\n1,2,3,4\n";
        let table = CsvTable::parse("t", data.as_bytes()).unwrap();

        assert_eq!(table.rows[0], vec![Some("1".into()), None, None]);
        assert_eq!(table.rows[1], vec![Some("1".into()), Some("2".into()), Some("3".into())]);
    }

    #[test]
    fn test_parse_header_only_and_blank() {
        let table = CsvTable::parse("t", "a,b\n".as_bytes()).unwrap();
        assert!(table.is_empty());

        let table = CsvTable::parse("t", "".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn test_parse_quoted_fields() {
        let data = "id,descricao\n1,\"Cabo, 10mm\"\n2,\"diz \"\"oi\"\"\"\n";
        let table = CsvTable::parse("materiais", data.as_bytes()).unwrap();

        assert_eq!(table.rows[0][1].as_deref(), Some("Cabo, 10mm"));
        assert_eq!(table.rows[1][1].as_deref(), Some("diz \"oi\""));
    }

    #[test]
    fn test_column_values_projection() {
        let data = "x,id,nome,id\n9,1,Alpha,2\n";
        let table = CsvTable::parse("t", data.as_bytes()).unwrap();

        let values = table.column_values(&["nome".to_string(), "id".to_string()]);
        assert_eq!(values, vec![vec![Some("Alpha".into()), Some("2".into())]]);
    }

    #[test]
    fn test_read_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("equipes.csv");
        std::fs::write(&path, "\u{feff}id,nome\n1,Alpha\n").unwrap();

        let table = CsvTable::read(&path).unwrap();
        assert_eq!(table.name, "equipes");
        assert_eq!(table.path, path);
        assert_eq!(table.headers, vec!["id", "nome"]);
    }

    #[test]
    fn test_discover_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), "id\n").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.csv"), "id\n").unwrap();

        let files = discover_csv_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_csv_files(&dir.path().join("tabelas")).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound(_)));
    }
}
