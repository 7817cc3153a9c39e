//! Configuration handling for the ZMap CLI
//!
//! Supports loading configuration from zmap.toml files with CLI argument overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zmap_canvas::MAX_WINDOW_SIZE;
use zmap_core::BumpSettings;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub bump: BumpSettings,
    #[serde(default)]
    pub canvas: CanvasConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log filter used when no -v flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Highest vertical zoom, in pixels per base
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,

    /// Tallest item the canvas can draw, in pixels
    #[serde(default = "default_max_window_size")]
    pub max_window_size: f64,
}

fn default_log_level() -> String { "info".to_string() }
fn default_max_zoom() -> f64 { 8.0 }
fn default_max_window_size() -> f64 { MAX_WINDOW_SIZE }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            max_zoom: default_max_zoom(),
            max_window_size: default_max_window_size(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find zmap.toml in current directory
                let default_path = PathBuf::from("zmap.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: zmap.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            CliError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Generate example configuration file content
    pub fn example_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default configuration")
    }
}
