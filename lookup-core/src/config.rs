use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    catalog::MalformedRowPolicy,
    provider::{mymemory, openmeteo},
};

/// Weather API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { base_url: openmeteo::DEFAULT_BASE_URL.to_string() }
    }
}

/// Translation API settings and the initially selected languages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub base_url: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: mymemory::DEFAULT_BASE_URL.to_string(),
            source_lang: "en".to_string(),
            target_lang: "es".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City list, see [`crate::catalog`].
    pub cities_path: PathBuf,

    /// Icon table, see [`crate::icons`].
    pub icons_path: PathBuf,

    pub malformed_rows: MalformedRowPolicy,

    /// Quiet period before a typed edit is translated.
    pub debounce_ms: u64,

    /// Example TOML:
    /// [weather]
    /// base_url = "https://api.open-meteo.com"
    pub weather: WeatherConfig,

    pub translation: TranslationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cities_path: PathBuf::from("data/worldcities.csv"),
            icons_path: PathBuf::from("data/icons.json"),
            malformed_rows: MalformedRowPolicy::default(),
            debounce_ms: 500,
            weather: WeatherConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load config from the default location, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "lookup", "lookup-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
