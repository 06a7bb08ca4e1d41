//! appdb CLI - initialize, list and bulk-load the local application database

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "appdb")]
#[command(version)]
#[command(about = "Initialize, inspect and bulk-load a local SQLite application database")]
#[command(long_about = r#"
appdb manages the application's SQLite database:
  • Create it from the SQL schema file
  • List the tables it holds
  • Import CSV files into the tables named after them

Paths default to backend/db/app.db, backend/db/schema.sql and
docs/tabelas, and can be overridden per command or in appdb.toml.

Example usage:
  appdb init
  appdb tables --counts
  appdb import --dir docs/tabelas --skip-missing
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "appdb.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database from the SQL schema file
    Init {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Path to the SQL schema file
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },

    /// List the tables in the database
    Tables {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Show row counts
        #[arg(long)]
        counts: bool,
    },

    /// Import every CSV file in a directory into the table of the same name
    Import {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Directory holding the CSV files
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Skip CSV files that have no matching table instead of failing
        #[arg(long)]
        skip_missing: bool,
    },

    /// Show table and row totals
    Stats {
        /// Path to the database file
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a config file with the default paths
    Config {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Print version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Tables { .. } => "tables",
            Commands::Import { .. } => "import",
            Commands::Stats { .. } => "stats",
            Commands::Config { .. } => "config",
            Commands::Version => "version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }
}

/// Print the JSON success envelope for a command
pub fn emit_success(
    output_mode: OutputMode,
    command: &str,
    data: serde_json::Value,
) -> anyhow::Result<()> {
    if output_mode == OutputMode::Json {
        let envelope = serde_json::json!({
            "ok": true,
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

/// Print the JSON failure envelope for a command
fn emit_error(command: &str, error: &anyhow::Error) -> anyhow::Result<()> {
    let envelope = serde_json::json!({
        "ok": false,
        "command": command,
        "error": format!("{:#}", error),
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let output_mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command_name = cli.command.name();

    if let Err(e) = run(cli, output_mode) {
        if output_mode.is_human() {
            appdb::ui::error(&format!("{:#}", e));
        } else {
            emit_error(command_name, &e)?;
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run(cli: Cli, output_mode: OutputMode) -> anyhow::Result<()> {
    let config = match cli.command {
        Commands::Config { .. } | Commands::Version => None,
        _ => appdb::config::load_config(Some(&cli.config))?,
    };

    match cli.command {
        Commands::Init { database, schema } => {
            let paths = appdb::ResolvedPaths::resolve(database, schema, None, config.as_ref());
            commands::run_init(output_mode, &paths)
        }
        Commands::Tables { database, counts } => {
            let paths = appdb::ResolvedPaths::resolve(database, None, None, config.as_ref());
            commands::run_tables(output_mode, &paths, counts)
        }
        Commands::Import { database, dir, skip_missing } => {
            let paths = appdb::ResolvedPaths::resolve(database, None, dir, config.as_ref());
            let options = appdb::ImportOptions { skip_missing_tables: skip_missing };
            commands::run_import(output_mode, &paths, options)
        }
        Commands::Stats { database } => {
            let paths = appdb::ResolvedPaths::resolve(database, None, None, config.as_ref());
            commands::run_stats(output_mode, &paths)
        }
        Commands::Config { force } => commands::run_config(output_mode, &cli.config, force),
        Commands::Version => commands::run_version(output_mode),
    }
}
