use crate::{emit_success, OutputMode};
use appdb::config::{write_config, AppdbConfig};
use appdb::import::{import_dir, ImportEvent, ImportOptions, ImportOutcome};
use appdb::storage::{init_database, Database, TableInfo};
use appdb::ui::{self, ImportProgress, Icons};
use appdb::ResolvedPaths;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run_init(output_mode: OutputMode, paths: &ResolvedPaths) -> anyhow::Result<()> {
    let report = init_database(&paths.database, &paths.schema)?;

    if output_mode.is_human() {
        ui::success("Database created successfully.");
        ui::info("Database", &paths.database.display().to_string());
        ui::info("Schema", &paths.schema.display().to_string());
        if !report.created_tables.is_empty() {
            ui::section("New tables");
            for table in &report.created_tables {
                ui::summary_row(Icons::TABLE, &ui::table_name(table));
            }
        }
    } else {
        emit_success(output_mode, "init", serde_json::to_value(&report)?)?;
    }
    Ok(())
}

pub fn run_tables(
    output_mode: OutputMode,
    paths: &ResolvedPaths,
    counts: bool,
) -> anyhow::Result<()> {
    let db = open_existing(&paths.database)?;

    let tables: Vec<TableInfo> = if counts {
        db.table_infos()?
    } else {
        db.list_tables()?
            .into_iter()
            .map(|name| TableInfo { name, rows: None })
            .collect()
    };

    if output_mode.is_human() {
        if counts {
            let rendered = ui::tables_table(&tables);
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
        } else {
            // Bare names, one per line, so the output pipes cleanly
            for table in &tables {
                println!("{}", table.name);
            }
        }
    } else {
        emit_success(output_mode, "tables", serde_json::json!({ "tables": tables }))?;
    }
    Ok(())
}

pub fn run_import(
    output_mode: OutputMode,
    paths: &ResolvedPaths,
    options: ImportOptions,
) -> anyhow::Result<()> {
    let mut db = Database::open(&paths.database)?;

    if !output_mode.is_human() {
        let report = import_dir(&mut db, &paths.csv_dir, options, |_| {})?;
        let data = serde_json::json!({
            "files": report.files(),
            "rows": report.rows(),
            "inserted": report.inserted(),
            "outcomes": report.outcomes,
        });
        return emit_success(output_mode, "import", data);
    }

    ui::header(
        Icons::ROCKET,
        &format!("Importing {} into {}", paths.csv_dir.display(), paths.database.display()),
    );

    let progress = ImportProgress::new();
    let report = import_dir(&mut db, &paths.csv_dir, options, |event| {
        progress.observe(&event);
        progress.suspend(|| print_event(&event));
    })?;

    progress.finish_with_summary(report.files(), report.rows(), report.inserted());
    Ok(())
}

fn print_event(event: &ImportEvent<'_>) {
    match event {
        ImportEvent::Discovered { total: 0 } => ui::warn("No CSV files found."),
        ImportEvent::Discovered { .. } => {}
        ImportEvent::Started { table, .. } => {
            ui::section(&format!("Importing table: {}", ui::table_name(table)));
        }
        ImportEvent::Finished { outcome } => match outcome {
            ImportOutcome::Imported { rows, inserted, skipped_columns, .. } => {
                ui::summary_row(
                    "->",
                    &format!("{} rows imported ({} new)", rows, inserted),
                );
                if !skipped_columns.is_empty() {
                    ui::summary_row(
                        "->",
                        &ui::dim(&format!("ignored columns: {}", skipped_columns.join(", "))),
                    );
                }
            }
            ImportOutcome::Empty { .. } => ui::skipped("empty CSV, skipping."),
            ImportOutcome::NoMatchingColumns { .. } => {
                ui::skipped("no CSV column matches the table, skipping.")
            }
            ImportOutcome::MissingTable { table } => {
                ui::skipped(&format!("table {} does not exist, skipping.", table))
            }
        },
    }
}

pub fn run_stats(output_mode: OutputMode, paths: &ResolvedPaths) -> anyhow::Result<()> {
    let db = open_existing(&paths.database)?;
    let stats = db.stats()?;

    if output_mode.is_human() {
        ui::header(
            Icons::STATS,
            &format!("appdb Statistics ({})", paths.database.display()),
        );
        println!("------------------------------------");
        print!("{}", stats);
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

pub fn run_config(output_mode: OutputMode, path: &Path, force: bool) -> anyhow::Result<()> {
    write_config(path, &AppdbConfig::with_defaults(), force)?;

    if output_mode.is_human() {
        ui::success(&format!("Wrote {}", path.display()));
    } else {
        emit_success(
            output_mode,
            "config",
            serde_json::json!({ "path": path.display().to_string() }),
        )?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        println!(
            "{} {}",
            "appdb".style(ui::theme().header.clone()),
            env!("CARGO_PKG_VERSION").style(ui::theme().success.clone())
        );
    } else {
        let data = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        });
        emit_success(output_mode, "version", data)?;
    }
    Ok(())
}

/// Open a database for reading without creating it
fn open_existing(path: &Path) -> anyhow::Result<Database> {
    if !path.is_file() {
        anyhow::bail!(
            "database {} does not exist (run `appdb init` first)",
            path.display()
        );
    }
    Ok(Database::open(path)?)
}
