use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{preferences::Preferences, provider::ProviderId};

/// Environment variable that overrides the stored OpenWeather API key.
pub const API_KEY_ENV: &str = "WEATHERDASH_OPENWEATHER_KEY";

pub const DEFAULT_CITY: &str = "Tehran";
pub const DEFAULT_ARCHIVE_YEAR: i32 = 2024;

/// Per-provider settings. Only OpenWeather needs a key; any provider may have
/// its base URL overridden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// City shown when none is given on the command line.
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Name entered at login, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// Calendar year the monthly averages are computed over.
    #[serde(default = "default_archive_year")]
    pub archive_year: i32,

    #[serde(default)]
    pub preferences: Preferences,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// OpenWeather key taken from the environment. Never written back to disk.
    #[serde(skip)]
    env_api_key: Option<String>,
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_archive_year() -> i32 {
    DEFAULT_ARCHIVE_YEAR
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            user_name: None,
            archive_year: default_archive_year(),
            preferences: Preferences::default(),
            providers: HashMap::new(),
            env_api_key: None,
        }
    }
}

impl Config {
    /// Load config from the platform location, or defaults if it doesn't exist yet.
    /// The API key environment variable takes precedence over the file.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

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
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        self.env_api_key = key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
    }

    /// Set or replace a provider's API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers
            .entry(provider_id.as_str().to_string())
            .or_default()
            .api_key = Some(api_key);
    }

    /// Returns API key for a provider, if present. The environment key wins
    /// over the stored one.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.env_api_key
            .as_deref()
            .filter(|_| provider_id == ProviderId::OpenWeather)
            .or_else(|| {
                self.providers
                    .get(provider_id.as_str())
                    .and_then(|cfg| cfg.api_key.as_deref())
            })
    }

    pub fn provider_base_url(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers
            .get(provider_id.as_str())
            .and_then(|cfg| cfg.base_url.as_deref())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        !provider_id.requires_api_key() || self.provider_api_key(provider_id).is_some()
    }
}
