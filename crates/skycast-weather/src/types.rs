use serde::{Deserialize, Serialize};

/// Normalized weather snapshot for one location.
///
/// Built once per upstream fetch and immutable afterwards; this is both the
/// cache payload and the shape served to the dashboard, so the wire names
/// follow the dashboard contract (`temp`, `rain_prob`, `aqi`, `city`).
///
/// All precipitation probabilities are percentages in 0–100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature, degrees Celsius.
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Perceived temperature, degrees Celsius.
    pub feels_like: f64,
    /// Relative humidity, percent.
    pub humidity: u8,
    /// Free-text condition label from the provider, e.g. "light rain".
    pub description: String,
    /// Provider icon code, e.g. "10d". See [`WeatherSnapshot::icon_category`].
    pub icon: String,
    /// Wind speed, meters per second.
    pub wind_speed: f64,
    /// Chance of rain in the soonest forecast window, percent.
    #[serde(rename = "rain_prob")]
    pub rain_chance: f64,
    /// Air quality index, 1 (good) through 5 (very poor).
    #[serde(rename = "aqi")]
    pub air_quality_index: u8,
    /// Resolved place name.
    #[serde(rename = "city")]
    pub city_name: String,
    /// Up to eight 3-hourly forecast points, chronological.
    pub forecast: Vec<ForecastPoint>,
}

impl WeatherSnapshot {
    /// Two-digit condition category prefix of the icon code ("10d" → "10").
    pub fn icon_category(&self) -> &str {
        self.icon.get(..2).unwrap_or(&self.icon)
    }

    /// Provider icon codes carry a trailing day/night marker ('d' or 'n').
    pub fn is_night(&self) -> bool {
        self.icon.ends_with('n')
    }
}

/// One 3-hourly forecast entry. Has no identity beyond its position in
/// [`WeatherSnapshot::forecast`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Local wall-clock label, `HH:MM`.
    pub time: String,
    /// Forecast temperature, degrees Celsius.
    #[serde(rename = "temp")]
    pub temperature: f64,
    /// Chance of rain for this window, percent.
    #[serde(rename = "rain_prob")]
    pub rain_chance: f64,
    /// Provider icon code for this window.
    pub icon: String,
}
