//! Layered daemon configuration.
//!
//! Values resolve with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file passed with `--config`
//! 4. Compiled defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use taskflow::access::UserId;
use taskflow::periodic::domain::TemplateDraft;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_POOL_SIZE: u32 = 8;

/// Errors raised while loading daemon configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this daemon.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
    /// A connection pool needs at least one connection.
    #[error("pool_size must be at least 1")]
    EmptyPool,
}

/// Command-line arguments for `taskflowd`.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Taskflow scheduling daemon")]
pub struct DaemonArgs {
    /// Path to a TOML config file.
    #[arg(short, long, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TASKFLOW_LOG")]
    pub log_level: Option<String>,

    /// `PostgreSQL` URL for task storage; tasks stay in memory when unset.
    #[arg(long, env = "TASKFLOW_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKFLOW_POOL_SIZE")]
    pub pool_size: Option<u32>,
}

/// Shape of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    log_level: Option<String>,
    database_url: Option<String>,
    pool_size: Option<u32>,
    periodic_tasks: Vec<TemplateSeed>,
}

impl ConfigFile {
    /// Parses config file contents.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }
}

/// Recurring template stored and armed when the daemon starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateSeed {
    /// Author recorded on the template and on every task it produces.
    pub created_by: UserId,
    /// Whether the trigger is armed at start.
    #[serde(default = "active_by_default")]
    pub active: bool,
    /// Template fields.
    #[serde(flatten)]
    pub draft: TemplateDraft,
}

const fn active_by_default() -> bool {
    true
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Log filter directive.
    pub log_level: String,
    /// Task store location; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Database pool size.
    pub pool_size: u32,
    /// Templates registered at start.
    pub periodic_tasks: Vec<TemplateSeed>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            periodic_tasks: Vec::new(),
        }
    }
}

impl DaemonConfig {
    /// Reads the config file named on the command line, if any, and merges
    /// it under the CLI values.
    pub fn load(args: &DaemonArgs) -> Result<Self, ConfigError> {
        let file = match args.config.as_deref() {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(args, file)
    }

    /// Merges CLI values over file values over defaults.
    pub fn resolve(args: &DaemonArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let pool_size = args
            .pool_size
            .or(file.pool_size)
            .unwrap_or(defaults.pool_size);
        if pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        Ok(Self {
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            database_url: args.database_url.clone().or(file.database_url),
            pool_size,
            periodic_tasks: file.periodic_tasks,
        })
    }
}
