//! Server configuration.
//!
//! An optional TOML file provides defaults; environment variables override
//! the values that typically come from the deployment environment
//! (`OPENWEATHER_API_KEY`, `HOST`, `PORT`). Missing file means defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skycast_weather::client::API_KEY_PLACEHOLDER;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Weather pipeline settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeather credential. The placeholder default is rejected at
    /// request time, not at startup.
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Where the snapshot cache database lives.
    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    /// Freshness window for cached snapshots, in minutes.
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Coordinate rounding for cache keys, in decimal places.
    #[serde(default = "default_coordinate_precision")]
    pub coordinate_precision: usize,
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_cache_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
        .join("weather_cache.db")
        .to_string_lossy()
        .into_owned()
}

fn default_cache_ttl_minutes() -> u64 {
    15
}

fn default_coordinate_precision() -> usize {
    2
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            cache_path: default_cache_path(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            coordinate_precision: default_coordinate_precision(),
        }
    }
}

impl Config {
    /// Load configuration from `$SKYCAST_CONFIG` or the platform config
    /// directory, falling back to defaults when no file exists, then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("SKYCAST_CONFIG")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::config_dir().map(|d| d.join("skycast").join("config.toml")));

        let mut config = match path {
            Some(p) if p.exists() => {
                let contents =
                    std::fs::read_to_string(&p).context("Failed to read config file")?;
                toml::from_str(&contents).context("Failed to parse config file")?
            }
            _ => Self::default(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENWEATHER_API_KEY") {
            if !key.trim().is_empty() {
                self.weather.api_key = key;
            }
        }
        if let Ok(host) = std::env::var("HOST") {
            if !host.is_empty() {
                self.server.host = host;
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    /// Whether the credential is set to something other than the
    /// placeholder. Used only to warn at startup; the request path makes
    /// its own check.
    pub fn has_configured_key(&self) -> bool {
        let key = self.weather.api_key.trim();
        !key.is_empty() && key != API_KEY_PLACEHOLDER
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.weather.cache_ttl_minutes * 60)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.weather.cache_ttl_minutes, 15);
        assert_eq!(config.weather.coordinate_precision, 2);
        assert!(!config.has_configured_key());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            [weather]
            api_key = "abc123"
            "#,
        )
        .unwrap();

        assert!(config.has_configured_key());
        assert_eq!(config.weather.cache_ttl_minutes, 15);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_tunable_cache_settings_parse() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 8080

            [weather]
            api_key = "abc123"
            cache_ttl_minutes = 5
            coordinate_precision = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.weather.coordinate_precision, 3);
    }

    #[test]
    fn test_placeholder_key_counts_as_unconfigured() {
        let mut config = Config::default();
        config.weather.api_key = API_KEY_PLACEHOLDER.to_string();
        assert!(!config.has_configured_key());

        config.weather.api_key = "   ".to_string();
        assert!(!config.has_configured_key());

        config.weather.api_key = "real-key".to_string();
        assert!(config.has_configured_key());
    }
}
