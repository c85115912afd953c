use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    model::UnitSystem,
    provider::openweather::DEFAULT_BASE_URL,
    session::{SessionOptions, SupersedePolicy},
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Five days of 3-hour points.
pub const DEFAULT_FORECAST_LIMIT: u32 = 40;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "imperial"
/// forecast_limit = 40
/// resample_on_unit_change = true
/// supersede = "last-settled-wins"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Provider base URL; the public OpenWeather endpoint when unset.
    pub base_url: Option<String>,

    pub units: UnitSystem,

    /// Maximum number of forecast points requested (`cnt`).
    pub forecast_limit: u32,

    pub resample_on_unit_change: bool,

    pub supersede: SupersedePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            units: UnitSystem::default(),
            forecast_limit: DEFAULT_FORECAST_LIMIT,
            resample_on_unit_change: true,
            supersede: SupersedePolicy::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
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
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    /// `env_value` wins unless it is blank.
    pub(crate) fn resolve_api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value.filter(|key| !key.trim().is_empty()).or_else(|| self.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            resample_on_unit_change: self.resample_on_unit_change,
            supersede: self.supersede,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();

        assert_eq!(cfg.units, UnitSystem::Metric);
        assert_eq!(cfg.forecast_limit, 40);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
        assert_eq!(cfg.session_options(), SessionOptions::default());
    }

    #[test]
    fn environment_key_overrides_stored_key() {
        let mut cfg = Config::default();
        assert_eq!(cfg.resolve_api_key(None), None);

        cfg.set_api_key("STORED".into());
        assert_eq!(cfg.resolve_api_key(None).as_deref(), Some("STORED"));
        assert_eq!(cfg.resolve_api_key(Some("ENV".into())).as_deref(), Some("ENV"));
        assert_eq!(cfg.resolve_api_key(Some("  ".into())).as_deref(), Some("STORED"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("OPEN_KEY".into());
        cfg.units = UnitSystem::Imperial;
        cfg.supersede = SupersedePolicy::LatestSubmitWins;
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("OPEN_KEY"));
        assert_eq!(loaded.units, UnitSystem::Imperial);
        assert_eq!(loaded.supersede, SupersedePolicy::LatestSubmitWins);
        assert_eq!(loaded.forecast_limit, DEFAULT_FORECAST_LIMIT);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            "units = \"imperial\"\nresample_on_unit_change = false\nbase_url = \"http://localhost:9\"\n",
        )
        .unwrap();

        assert_eq!(cfg.units, UnitSystem::Imperial);
        assert!(!cfg.session_options().resample_on_unit_change);
        assert_eq!(cfg.base_url(), "http://localhost:9");
        assert_eq!(cfg.forecast_limit, DEFAULT_FORECAST_LIMIT);
    }

    #[test]
    fn invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "units = 42").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
