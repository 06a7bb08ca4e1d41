use crate::storage::TableInfo;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub name: String,
    #[tabled(rename = "Rows")]
    pub rows: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, name: &str, rows: &str) {
        self.rows.push(TableRow {
            name: name.to_string(),
            rows: rows.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Render table names with their row counts; unknown counts show as `-`
pub fn tables_table(tables: &[TableInfo]) -> String {
    let mut builder = TableBuilder::new();
    for table in tables {
        let rows = table
            .rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        builder.add_row(&table.name, &rows);
    }
    builder.build()
}
