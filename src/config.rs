//! Process configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional YAML file
//! named by `SKIRMISH_CONFIG`, then the `SKIRMISH_*` environment variables.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::combat::{BattleConfig, DEFAULT_MAX_ROUNDS};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

pub const ENV_CONFIG_FILE: &str = "SKIRMISH_CONFIG";
pub const ENV_BIND: &str = "SKIRMISH_BIND";
pub const ENV_LOG_DIR: &str = "SKIRMISH_LOG_DIR";
pub const ENV_MAX_ROUNDS: &str = "SKIRMISH_MAX_ROUNDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    bind_addr: Option<String>,
    log_dir: Option<PathBuf>,
    max_rounds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Finished battle logs are written here when set.
    pub log_dir: Option<PathBuf>,
    pub max_rounds: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            log_dir: None,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_CONFIG_FILE).filter(|p| !p.trim().is_empty()) {
            config.apply_file(load_file(PathBuf::from(path))?)?;
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|b| !b.trim().is_empty()) {
            config.bind_addr = bind;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|d| !d.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup(ENV_MAX_ROUNDS) {
            config.max_rounds = parse_positive(ENV_MAX_ROUNDS, &raw)?;
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(bind) = file.bind_addr {
            self.bind_addr = bind;
        }
        if file.log_dir.is_some() {
            self.log_dir = file.log_dir;
        }
        if let Some(max_rounds) = file.max_rounds {
            self.max_rounds = ensure_positive("max_rounds", max_rounds)?;
        }
        Ok(())
    }

    pub fn battle_config(&self) -> BattleConfig {
        BattleConfig {
            max_rounds: self.max_rounds,
        }
    }
}

fn load_file(path: PathBuf) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

fn parse_positive(key: &'static str, raw: &str) -> Result<u32, ConfigError> {
    let value = raw.trim().parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })?;
    ensure_positive(key, value)
}

fn ensure_positive(key: &'static str, value: u32) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}
