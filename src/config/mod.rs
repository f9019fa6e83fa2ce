use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::ConfigError,
    utils::{self, paths},
};

pub const DEFAULT_STORAGE_KEY: &str = "expense-tracker.v1";
const DEFAULT_BUDGET: i64 = 500_000;

/// User-tunable settings for the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Budget ceiling used for a fresh ledger and restored by `reset`.
    #[serde(default = "TrackerConfig::default_budget_value")]
    pub default_budget: Decimal,
    #[serde(default = "TrackerConfig::default_storage_key")]
    pub storage_key: String,
    /// Optional custom directory for persisted ledgers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_budget: Self::default_budget_value(),
            storage_key: Self::default_storage_key(),
            data_dir: None,
        }
    }
}

impl TrackerConfig {
    pub fn default_budget_value() -> Decimal {
        Decimal::from(DEFAULT_BUDGET)
    }

    pub fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    /// Directory for ledger blobs: the configured one, or `data/` under `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => paths::data_dir_in(base),
        }
    }
}

/// Loads and saves [`TrackerConfig`] as JSON inside a base directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        let path = paths::config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> Result<TrackerConfig, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(TrackerConfig::default())
        }
    }

    pub fn save(&self, config: &TrackerConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        utils::fs::write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
