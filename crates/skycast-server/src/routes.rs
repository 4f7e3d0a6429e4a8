//! Router and request handlers.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use skycast_weather::{compute_insights, LifestyleInsights, WeatherSnapshot};

use crate::error::ApiError;
use crate::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, ApiError>;

/// Build the application router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Query selector: coordinates take precedence over a city name.
#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
}

/// Success body: the snapshot plus insights derived from it.
#[derive(Debug, Serialize)]
pub struct WeatherResponse {
    pub weather: WeatherSnapshot,
    pub insights: LifestyleInsights,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /weather?lat=..&lon=.. or GET /weather?city=..
async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> HandlerResult<WeatherResponse> {
    let weather = match query {
        WeatherQuery {
            lat: Some(lat),
            lon: Some(lon),
            ..
        } => state.service.fetch_by_coordinates(lat, lon).await?,
        WeatherQuery {
            city: Some(city), ..
        } if !city.trim().is_empty() => state.service.fetch_by_city(city.trim()).await?,
        _ => {
            return Err(ApiError::BadRequest(
                "Latitude/Longitude or City is required".to_string(),
            ))
        }
    };

    let insights = compute_insights(&weather);
    Ok(Json(WeatherResponse { weather, insights }))
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
