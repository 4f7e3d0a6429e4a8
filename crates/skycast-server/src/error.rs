//! HTTP error mapping.
//!
//! Every failure renders as `{ "error": <message> }`. Status codes are
//! picked per error variant; upstream statuses pass through when known.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use skycast_weather::WeatherError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Request selected neither coordinates nor a city.
    BadRequest(String),
    /// Failure from the weather pipeline.
    Weather(WeatherError),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::Weather(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Weather(err) => (weather_status(&err), err.to_string()),
        };

        tracing::warn!(status = %status, "weather request failed: {message}");
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn weather_status(err: &WeatherError) -> StatusCode {
    match err {
        WeatherError::ApiKeyMissing => StatusCode::INTERNAL_SERVER_ERROR,
        WeatherError::ApiKeyInvalid => StatusCode::UNAUTHORIZED,
        WeatherError::CityNotFound(_) => StatusCode::NOT_FOUND,
        WeatherError::Upstream {
            status: Some(code), ..
        } => StatusCode::from_u16(*code).unwrap_or(StatusCode::BAD_GATEWAY),
        WeatherError::Upstream { status: None, .. } => StatusCode::BAD_GATEWAY,
        WeatherError::Network(_) => StatusCode::BAD_GATEWAY,
        WeatherError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_per_failure_class() {
        assert_eq!(
            weather_status(&WeatherError::ApiKeyMissing),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            weather_status(&WeatherError::ApiKeyInvalid),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            weather_status(&WeatherError::CityNotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            weather_status(&WeatherError::Cache("disk full".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_known_upstream_status_passes_through() {
        let err = WeatherError::Upstream {
            status: Some(429),
            message: "too many requests".to_string(),
        };
        assert_eq!(weather_status(&err), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_unknown_upstream_status_is_bad_gateway() {
        let err = WeatherError::Upstream {
            status: None,
            message: "mangled body".to_string(),
        };
        assert_eq!(weather_status(&err), StatusCode::BAD_GATEWAY);

        let invalid = WeatherError::Upstream {
            status: Some(42),
            message: "nonsense status".to_string(),
        };
        assert_eq!(weather_status(&invalid), StatusCode::BAD_GATEWAY);
    }
}
