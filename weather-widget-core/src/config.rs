use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
pub const DEFAULT_CITY: &str = "Auckland";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variables consulted by [`Config::apply_env`], in priority order for the key.
pub const ENV_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_API_KEY_LEGACY: &str = "VITE_WEATHER_API_KEY";
pub const ENV_BASE_URL: &str = "WEATHER_API_BASE_URL";
pub const ENV_DEFAULT_CITY: &str = "WEATHER_DEFAULT_CITY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "No WeatherAPI key configured.\n\
         Hint: set WEATHER_API_KEY or run `weather-widget configure`."
    )]
    MissingApiKey,

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("timeout_secs must be at least 1")]
    ZeroTimeout,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Auckland"
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_city: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_city: DEFAULT_CITY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// The key must never reach logs, so Debug is written by hand.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("default_city", &self.default_city)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Load the config file (if any), then overlay `.env` and process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;

        dotenv_outcome(dotenvy::dotenv().map(|_| ()))?;
        cfg.apply_env(|name| std::env::var(name).ok());

        Ok(cfg)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Load config from `path`, or return defaults if there is no file there.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay values from environment variables. `lookup` abstracts `std::env::var`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY).or_else(|| lookup(ENV_API_KEY_LEGACY)) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(city) = lookup(ENV_DEFAULT_CITY) {
            self.default_city = city;
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The API key, or an error if it is absent or blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Per-request HTTP timeout. Zero is rejected since every request would fail.
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match self.timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

/// Only a missing `.env` is tolerated; a malformed one stops parsing at the
/// bad line and would silently drop every variable after it.
fn dotenv_outcome(result: dotenvy::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("Failed to load .env"),
    }
}
