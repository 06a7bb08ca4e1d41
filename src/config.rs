use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE: &str = "backend/db/app.db";
pub const DEFAULT_SCHEMA: &str = "backend/db/schema.sql";
pub const DEFAULT_CSV_DIR: &str = "docs/tabelas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppdbConfig {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub csv_dir: Option<String>,
}

impl AppdbConfig {
    /// Config with every path spelled out, as written by `appdb config`
    pub fn with_defaults() -> Self {
        Self {
            database: Some(DEFAULT_DATABASE.to_string()),
            schema: Some(DEFAULT_SCHEMA.to_string()),
            csv_dir: Some(DEFAULT_CSV_DIR.to_string()),
        }
    }
}

/// Paths after applying CLI flag > config file > built-in default.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPaths {
    pub database: PathBuf,
    pub schema: PathBuf,
    pub csv_dir: PathBuf,
}

impl ResolvedPaths {
    pub fn resolve(
        database: Option<PathBuf>,
        schema: Option<PathBuf>,
        csv_dir: Option<PathBuf>,
        config: Option<&AppdbConfig>,
    ) -> Self {
        let config = config.cloned().unwrap_or_default();

        Self {
            database: database
                .or_else(|| config.database.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            schema: schema
                .or_else(|| config.schema.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA)),
            csv_dir: csv_dir
                .or_else(|| config.csv_dir.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_DIR)),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("appdb.toml")
}

pub fn load_config(path: Option<&Path>) -> Result<Option<AppdbConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: AppdbConfig = toml::from_str(&contents)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &AppdbConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::ConfigExists(path.to_path_buf()));
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::debug!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
