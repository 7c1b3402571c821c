use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Location, notify::DEFAULT_DISPLAY_TIME, refresh::DEFAULT_REFRESH_INTERVAL};

pub const DEFAULT_LOCATIONIQ_URL: &str = "https://api.locationiq.com/v1/";

pub const ENV_BACKEND_URL: &str = "REPORTER_BACKEND_URL";
pub const ENV_LOCATIONIQ_URL: &str = "REPORTER_LOCATIONIQ_URL";
pub const ENV_LOCATIONIQ_KEY: &str = "REPORTER_LOCATIONIQ_KEY";

/// Credentials for the LocationIQ autocomplete service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationIqConfig {
    pub api_url: String,
    pub api_key: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// backend_url = "https://weather.example.com/api/"
/// refresh_interval_secs = 300
///
/// [locationiq]
/// api_url = "https://api.locationiq.com/v1/"
/// api_key = "pk.xxx"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Base URL of the weather aggregation backend.
    pub backend_url: Option<String>,

    pub refresh_interval_secs: Option<u64>,

    /// How long a notification stays visible.
    pub notification_millis: Option<u64>,

    pub locationiq: Option<LocationIqConfig>,

    /// Replaces the built-in fallback location.
    pub default_location: Option<Location>,
}

impl Config {
    pub fn backend_url(&self) -> Result<&str> {
        self.backend_url.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| {
            anyhow!(
                "No backend URL configured.\n\
                 Hint: run `reporter configure backend` or set {ENV_BACKEND_URL}."
            )
        })
    }

    pub fn locationiq(&self) -> Result<&LocationIqConfig> {
        self.locationiq.as_ref().filter(|c| !c.api_key.is_empty()).ok_or_else(|| {
            anyhow!(
                "No LocationIQ API key configured.\n\
                 Hint: run `reporter configure locationiq` or set {ENV_LOCATIONIQ_KEY}."
            )
        })
    }

    pub fn set_backend_url(&mut self, url: String) {
        self.backend_url = Some(url);
    }

    pub fn set_locationiq(&mut self, api_url: Option<String>, api_key: String) {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_LOCATIONIQ_URL.to_string());
        self.locationiq = Some(LocationIqConfig { api_url, api_key });
    }

    pub fn refresh_interval(&self) -> Duration {
        match self.refresh_interval_secs {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_REFRESH_INTERVAL,
        }
    }

    pub fn notification_time(&self) -> Duration {
        self.notification_millis.map_or(DEFAULT_DISPLAY_TIME, Duration::from_millis)
    }

    pub fn initial_location(&self) -> Location {
        self.default_location.clone().unwrap_or_default()
    }

    /// Overlay settings from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = Some(url);
        }

        if let Some(key) = lookup(ENV_LOCATIONIQ_KEY) {
            let url = lookup(ENV_LOCATIONIQ_URL)
                .or_else(|| self.locationiq.as_ref().map(|c| c.api_url.clone()));
            self.set_locationiq(url, key);
        } else if let (Some(url), Some(cfg)) =
            (lookup(ENV_LOCATIONIQ_URL), self.locationiq.as_mut())
        {
            cfg.api_url = url;
        }

        self
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "weather-reporter", "reporter")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
