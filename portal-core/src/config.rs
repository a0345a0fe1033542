use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    model::{LocationQuery, Units},
    refresh::DEFAULT_REFRESH,
};

/// Weather widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// Optional provider host override, mostly for testing.
    pub base_url: Option<String>,

    /// Provider query string, e.g. "Resende,RJ,BR".
    pub city: String,

    /// Name shown to users.
    pub city_name: String,

    pub units: Units,

    /// Language for condition descriptions, e.g. "pt_br".
    pub language: String,

    /// Widget refresh period in minutes.
    pub refresh_minutes: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            city: "Resende,RJ,BR".to_string(),
            city_name: "Resende".to_string(),
            units: Units::Metric,
            language: "pt_br".to_string(),
            refresh_minutes: DEFAULT_REFRESH.as_secs() / 60,
        }
    }
}

impl WeatherConfig {
    pub fn location_query(&self) -> LocationQuery {
        LocationQuery {
            city: self.city.clone(),
            units: self.units,
            language: self.language.clone(),
        }
    }

    /// Refresh period, never shorter than one minute.
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_minutes.max(1) * 60)
    }
}

/// Site search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Path to the JSON search index.
    pub index_path: Option<PathBuf>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [weather]
/// api_key = "..."
/// city = "Resende,RJ,BR"
///
/// [search]
/// index_path = "/srv/portal/js/search_index.json"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
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

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
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
        let dirs = ProjectDirs::from("dev", "municipal-portal", "portal")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Search index path, or an error with a hint if none was configured.
    pub fn search_index_path(&self) -> Result<&Path> {
        self.search.index_path.as_deref().ok_or_else(|| {
            anyhow!(
                "No search index configured.\n\
                 Hint: pass --index <path> or set [search] index_path in the config file."
            )
        })
    }

    pub fn is_weather_configured(&self) -> bool {
        self.weather.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}
