pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    dim, error, header, info, section, skipped, success, summary_row, table_name, warn,
};
pub use progress::ImportProgress;
pub use table::{tables_table, TableBuilder};
pub use theme::{theme, Theme};
