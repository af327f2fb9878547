use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::provider::openweather::{DEFAULT_BASE_URL, OpenWeatherClient};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

pub const FALLBACK_CITY: &str = "Bangalore";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Bangalore"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_city: Option<String>,
    /// Only needed when talking to something other than api.openweathermap.org.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "weather-watcher", "weather-watcher")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key. Blank input clears it.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = non_blank(Some(api_key));
    }

    pub fn set_default_city(&mut self, city: String) {
        self.default_city = non_blank(Some(city));
    }

    /// API key to use: `env_override` (usually `$OPENWEATHER_API_KEY`) wins over the file.
    pub fn api_key(&self, env_override: Option<String>) -> Option<String> {
        non_blank(env_override).or_else(|| non_blank(self.api_key.clone()))
    }

    pub fn city_or_default(&self, requested: Option<String>) -> String {
        non_blank(requested)
            .or_else(|| non_blank(self.default_city.clone()))
            .unwrap_or_else(|| FALLBACK_CITY.to_string())
    }

    /// Build the HTTP client for the live pipeline.
    pub fn openweather_client(&self, env_override: Option<String>) -> Result<OpenWeatherClient> {
        let api_key = self.api_key(env_override).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather-watcher configure` or set {API_KEY_ENV}."
            )
        })?;

        let base_url =
            non_blank(self.base_url.clone()).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenWeatherClient::new(api_key)?.with_base_url(base_url))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_wins_over_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        assert_eq!(cfg.api_key(None).as_deref(), Some("FILE_KEY"));
        assert_eq!(cfg.api_key(Some("ENV_KEY".into())).as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.api_key(Some("   ".into())).as_deref(), Some("FILE_KEY"));
    }

    #[test]
    fn client_requires_a_key() {
        let cfg = Config::default();
        let err = cfg.openweather_client(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `weather-watcher configure`"));
    }

    #[test]
    fn client_uses_configured_base_url() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://localhost:8080/".into()),
            ..Config::default()
        };

        let client = cfg.openweather_client(None).expect("key is configured");
        assert_eq!(client.base_url(), "http://localhost:8080");

        let client = Config { base_url: None, ..cfg }.openweather_client(None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn city_falls_back_to_config_then_bangalore() {
        let mut cfg = Config::default();
        assert_eq!(cfg.city_or_default(None), FALLBACK_CITY);

        cfg.set_default_city("Chennai".into());
        assert_eq!(cfg.city_or_default(None), "Chennai");
        assert_eq!(cfg.city_or_default(Some("Delhi".into())), "Delhi");
        assert_eq!(cfg.city_or_default(Some("".into())), "Chennai");
    }

    #[test]
    fn blank_values_clear_settings() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_api_key("  ".into());
        assert_eq!(cfg.api_key, None);
    }

    #[test]
    fn save_and_load_through_toml() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            api_key: Some("KEY".into()),
            default_city: Some("Bangalore".into()),
            base_url: None,
        };
        cfg.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert_eq!(loaded, cfg);
        Ok(())
    }

    #[test]
    fn missing_file_loads_default() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path)?, Config::default());
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [not toml")?;

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
        Ok(())
    }
}
