//! Configuration file support for the StreamLogic CLI
//!
//! Supports loading configuration from .streamlogicrc files in:
//! - Current directory
//! - User home directory
//! - Custom path via environment variable

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use streamlogic_ir::SessionConfig;

use crate::logging::LogLevel;

const CONFIG_FILE: &str = ".streamlogicrc";
const CONFIG_ENV: &str = "STREAMLOGIC_CONFIG";

/// Configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable colored output
    pub colored: bool,

    /// Default log level
    pub log_level: LogLevel,

    /// Problem name used when the file does not declare one
    pub default_problem_name: String,

    /// Object naming for each planning session
    pub session: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colored: true,
            log_level: LogLevel::Warn,
            default_problem_name: "problem".to_string(),
            session: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Find and load configuration file
    ///
    /// Search order:
    /// 1. STREAMLOGIC_CONFIG environment variable
    /// 2. .streamlogicrc in current directory
    /// 3. .streamlogicrc in user home directory
    pub fn load_default() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if let Ok(config) = Self::load(Path::new(&path)) {
                return config;
            }
        }

        let current_config = PathBuf::from(CONFIG_FILE);
        if current_config.exists() {
            if let Ok(config) = Self::load(&current_config) {
                return config;
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(CONFIG_FILE);
            if home_config.exists() {
                if let Ok(config) = Self::load(&home_config) {
                    return config;
                }
            }
        }

        Self::default()
    }

    /// Get configuration file path (current or home)
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        let current = PathBuf::from(CONFIG_FILE);
        if current.exists() {
            return current;
        }

        if let Some(home) = dirs::home_dir() {
            home.join(CONFIG_FILE)
        } else {
            current
        }
    }

    /// Create a default configuration file
    pub fn create_default() -> Result<PathBuf> {
        let config = Self::default();
        let path = Self::config_path();
        config.save(&path)?;
        Ok(path)
    }
}
