///! CLI configuration management

use crate::logging::{LogRotation, LoggingConfig};
use anyhow::Result;
use portside_console::kubernetes::QuotaDefaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: String,
    pub endpoint_id: u32,
    pub token: Option<String>,
    /// Output format (table, json, yaml)
    pub output: String,
    /// Tab memory file, defaults to tabs.json next to this file
    pub tab_store: Option<PathBuf>,
    pub logging: LoggingSection,
    pub quota_defaults: QuotaDefaultsSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "http://localhost:9000".to_string(),
            endpoint_id: 1,
            token: None,
            output: "table".to_string(),
            tab_store: None,
            logging: LoggingSection::default(),
            quota_defaults: QuotaDefaultsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub file_path: Option<String>,
    pub rotation: LogRotation,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file_path: None,
            rotation: LogRotation::Daily,
            json: true,
        }
    }
}

impl From<&LoggingSection> for LoggingConfig {
    fn from(section: &LoggingSection) -> Self {
        Self {
            level: section.level.clone(),
            file_path: section.file_path.clone(),
            rotation: section.rotation,
            json_format: section.json,
        }
    }
}

/// Lower bounds for quota limits, in cores and megabytes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotaDefaultsSection {
    pub cpu_limit: f64,
    pub memory_limit_mb: u64,
}

impl From<&QuotaDefaultsSection> for QuotaDefaults {
    fn from(section: &QuotaDefaultsSection) -> Self {
        Self {
            cpu_limit: section.cpu_limit,
            memory_limit: section.memory_limit_mb,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        Ok(())
    }

    pub fn tab_store_path(&self) -> Result<PathBuf> {
        match &self.tab_store {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("tabs.json")),
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join(".config/portside"))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("cli.toml"))
    }
}
