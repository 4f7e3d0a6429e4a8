//! Weather pipeline error types.
//!
//! One variant per failure class so the request boundary can pick status
//! codes by matching on the variant instead of parsing message strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Credential absent, blank, or still the placeholder value. Checked
    /// before any cache or network activity.
    #[error("OpenWeather API key is missing. Set OPENWEATHER_API_KEY or add it to the config file.")]
    ApiKeyMissing,

    /// Upstream rejected the credential.
    #[error("The OpenWeather API key is invalid or not yet active. It can take up to 2 hours for new keys to activate.")]
    ApiKeyInvalid,

    /// Geocoding found no match for the requested place name.
    #[error("City \"{0}\" not found.")]
    CityNotFound(String),

    /// Any other upstream failure, carrying the provider's status code and
    /// message when available.
    #[error("OpenWeather request failed: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Snapshot cache storage failure. Fatal to the current request, never
    /// masked as a cache miss.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Transport-level failure reaching the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<rusqlite::Error> for WeatherError {
    fn from(err: rusqlite::Error) -> Self {
        WeatherError::Cache(err.to_string())
    }
}
