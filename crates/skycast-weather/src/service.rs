//! Weather aggregation service.
//!
//! Owns the upstream client and the snapshot cache. A fetch checks the
//! credential, consults the cache, and only on a miss fans out to the three
//! upstream endpoints concurrently; the normalized snapshot is written back
//! before it is returned.

use tracing::instrument;

use crate::cache::WeatherCache;
use crate::client::{AirQuality, CurrentConditions, Forecast, OpenWeatherClient};
use crate::error::WeatherError;
use crate::types::{ForecastPoint, WeatherSnapshot};

/// Number of 3-hourly forecast points kept in a snapshot (~24 hours).
const FORECAST_POINTS: usize = 8;

pub struct WeatherService {
    client: OpenWeatherClient,
    cache: WeatherCache,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient, cache: WeatherCache) -> Self {
        Self { client, cache }
    }

    /// Weather snapshot for a coordinate pair, served from cache when a
    /// fresh entry exists.
    ///
    /// On a miss the three upstream calls run concurrently and all must
    /// succeed; a single failure fails the whole request.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot, WeatherError> {
        self.client.api_key()?;

        if let Some(snapshot) = self.cache.get(lat, lon)? {
            tracing::debug!(lat, lon, "serving cached snapshot");
            return Ok(snapshot);
        }

        let (current, air, forecast) = tokio::try_join!(
            self.client.current_conditions(lat, lon),
            self.client.air_quality(lat, lon),
            self.client.forecast(lat, lon),
        )?;

        let snapshot = normalize(current, air, forecast)?;
        self.cache.put(lat, lon, &snapshot)?;
        Ok(snapshot)
    }

    /// Weather snapshot for a place name: resolve coordinates via direct
    /// geocoding, then delegate to [`Self::fetch_by_coordinates`].
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.client.api_key()?;

        let matches = self.client.geocode(city).await?;
        let Some(best) = matches.first() else {
            return Err(WeatherError::CityNotFound(city.to_string()));
        };

        self.fetch_by_coordinates(best.lat, best.lon).await
    }
}

/// Collapse the three raw responses into one snapshot.
///
/// The forecast is truncated to the first [`FORECAST_POINTS`] entries and
/// its 0–1 `pop` fractions become percentages. The snapshot-level rain
/// chance is the soonest forecast window's, 0 when the forecast is empty.
fn normalize(
    current: CurrentConditions,
    air: AirQuality,
    forecast: Forecast,
) -> Result<WeatherSnapshot, WeatherError> {
    let condition = current
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Upstream {
            status: None,
            message: "current conditions carried no weather entry".to_string(),
        })?;

    let aqi = air
        .list
        .first()
        .map(|entry| entry.main.aqi)
        .ok_or_else(|| WeatherError::Upstream {
            status: None,
            message: "air quality response carried no readings".to_string(),
        })?;

    let points: Vec<ForecastPoint> = forecast
        .list
        .iter()
        .take(FORECAST_POINTS)
        .map(|entry| ForecastPoint {
            time: format_time_label(entry.dt),
            temperature: entry.main.temp,
            rain_chance: entry.pop * 100.0,
            icon: entry
                .weather
                .first()
                .map(|w| w.icon.clone())
                .unwrap_or_default(),
        })
        .collect();

    let rain_chance = points.first().map(|p| p.rain_chance).unwrap_or(0.0);

    Ok(WeatherSnapshot {
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        humidity: current.main.humidity,
        description: condition.description,
        icon: condition.icon,
        wind_speed: current.wind.speed,
        rain_chance,
        air_quality_index: aqi,
        city_name: current.name,
        forecast: points,
    })
}

/// Local wall-clock `HH:MM` label for a forecast timestamp.
fn format_time_label(unix_secs: i64) -> String {
    chrono::DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}
