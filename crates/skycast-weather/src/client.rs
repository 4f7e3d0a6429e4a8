//! OpenWeather API client.
//!
//! Thin typed wrapper over the four upstream endpoints the dashboard needs:
//! current conditions, air pollution, the 3-hourly forecast, and direct
//! geocoding. Response normalization lives in [`crate::service`].

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const OPENWEATHER_GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder shipped in the default config; counts as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_OPENWEATHER_API_KEY";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

/// Raw current-conditions response, metric units.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentConditions {
    pub main: MainReadings,
    pub weather: Vec<ConditionLabel>,
    pub wind: Wind,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionLabel {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Wind {
    pub speed: f64,
}

/// Raw air-pollution response; the index lives in the first list entry.
#[derive(Debug, Deserialize)]
pub(crate) struct AirQuality {
    pub list: Vec<AirQualityEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AirQualityEntry {
    pub main: AqiReading,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AqiReading {
    pub aqi: u8,
}

/// Raw 5-day/3-hour forecast response.
#[derive(Debug, Deserialize)]
pub(crate) struct Forecast {
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastEntry {
    pub dt: i64,
    pub main: ForecastReadings,
    pub weather: Vec<ConditionLabel>,
    /// Probability of precipitation as a 0–1 fraction.
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastReadings {
    pub temp: f64,
}

/// One direct-geocoding match.
#[derive(Debug, Deserialize)]
pub(crate) struct GeoMatch {
    pub lat: f64,
    pub lon: f64,
}

/// Error body shape shared by all OpenWeather endpoints.
#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    message: Option<String>,
}

impl OpenWeatherClient {
    /// Client against the production OpenWeather endpoints.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::new_with_urls(api_key, OPENWEATHER_BASE_URL, OPENWEATHER_GEO_URL)
    }

    /// Client against custom endpoint roots (mock servers in tests).
    pub fn new_with_urls(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        geo_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            geo_url: geo_url.into(),
        })
    }

    /// The credential gate: no request leaves the process without a usable
    /// key. Blank and placeholder values count as missing.
    pub(crate) fn api_key(&self) -> Result<&str, WeatherError> {
        let key = self.api_key.trim();
        if key.is_empty() || key == API_KEY_PLACEHOLDER {
            return Err(WeatherError::ApiKeyMissing);
        }
        Ok(key)
    }

    #[instrument(skip(self), level = "debug")]
    pub(crate) async fn current_conditions(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
                ("appid", key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self), level = "debug")]
    pub(crate) async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQuality, WeatherError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(format!("{}/air_pollution", self.base_url))
            .query(&[
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
                ("appid", key),
            ])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self), level = "debug")]
    pub(crate) async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast, WeatherError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(format!("{}/forecast", self.base_url))
            .query(&[
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
                ("appid", key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Best coordinate matches for a free-text place name, best first.
    #[instrument(skip(self), level = "debug")]
    pub(crate) async fn geocode(&self, city: &str) -> Result<Vec<GeoMatch>, WeatherError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(format!("{}/direct", self.geo_url))
            .query(&[("q", city), ("limit", "1"), ("appid", key)])
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Map an upstream response to a typed result. Unauthorized becomes
    /// [`WeatherError::ApiKeyInvalid`]; every other non-success status is
    /// passed through with the provider's message when it sends one.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(WeatherError::ApiKeyInvalid);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<UpstreamErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        format!("HTTP {}", status.as_u16())
                    } else {
                        text
                    }
                });
            return Err(WeatherError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        response.json().await.map_err(|e| WeatherError::Upstream {
            status: None,
            message: format!("unexpected response body: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new_with_urls("test_key", server.uri(), server.uri()).unwrap()
    }

    #[tokio::test]
    async fn test_current_conditions_deserializes() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": { "temp": 17.3, "feels_like": 16.8, "humidity": 71 },
                "weather": [ { "description": "light rain", "icon": "10d" } ],
                "wind": { "speed": 5.4 },
                "name": "Bergen"
            })))
            .mount(&server)
            .await;

        let current = client_for(&server)
            .current_conditions(60.39, 5.32)
            .await
            .unwrap();

        assert_eq!(current.main.humidity, 71);
        assert_eq!(current.weather[0].description, "light rain");
        assert_eq!(current.name, "Bergen");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_invalid_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).current_conditions(0.0, 0.0).await;

        assert!(matches!(result, Err(WeatherError::ApiKeyInvalid)));
    }

    #[tokio::test]
    async fn test_upstream_failure_carries_status_and_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "cod": 503,
                "message": "upstream maintenance"
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).forecast(0.0, 0.0).await;

        match result {
            Err(WeatherError::Upstream { status, message }) => {
                assert_eq!(status, Some(503));
                assert_eq!(message, "upstream maintenance");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_without_json_body_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/air_pollution"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client_for(&server).air_quality(0.0, 0.0).await;

        match result {
            Err(WeatherError::Upstream { status, message }) => {
                assert_eq!(status, Some(500));
                assert_eq!(message, "HTTP 500");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_geocode_sends_place_name_and_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/direct"))
            .and(query_param("q", "Porto"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "name": "Porto", "lat": 41.15, "lon": -8.61 }
            ])))
            .mount(&server)
            .await;

        let matches = client_for(&server).geocode("Porto").await.unwrap();

        assert_eq!(matches.len(), 1);
        assert!((matches[0].lat - 41.15).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_blank_and_placeholder_keys_are_rejected_before_any_request() {
        for key in ["", "   ", API_KEY_PLACEHOLDER] {
            let client =
                OpenWeatherClient::new_with_urls(key, "http://127.0.0.1:9", "http://127.0.0.1:9")
                    .unwrap();
            let result = client.current_conditions(0.0, 0.0).await;
            assert!(matches!(result, Err(WeatherError::ApiKeyMissing)));
        }
    }
}
