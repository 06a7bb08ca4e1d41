//! CSV Import - loads `<dir>/*.csv` into tables named after each file
//!
//! - `csv_source`: discovery and reading of CSV files
//! - `importer`: column matching and `INSERT OR IGNORE` loading

pub mod csv_source;
pub mod importer;

pub use csv_source::{discover_csv_files, CsvTable};
pub use importer::{
    import_dir, import_file, ImportEvent, ImportOptions, ImportOutcome, ImportReport,
};
