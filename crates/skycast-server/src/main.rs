//! Skycast server binary.
//!
//! Wires the pieces together: configuration, the snapshot cache (opened
//! once here, closed when the state drops at shutdown), the OpenWeather
//! client, and the HTTP router.

use anyhow::{Context, Result};
use tracing::{info, warn};

use skycast_server::{create_router, AppState, Config};
use skycast_weather::{OpenWeatherClient, WeatherCache, WeatherService};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    if !config.has_configured_key() {
        warn!("OpenWeather API key is not configured; weather requests will fail until OPENWEATHER_API_KEY is set");
    }

    if let Some(parent) = std::path::Path::new(&config.weather.cache_path).parent() {
        std::fs::create_dir_all(parent).context("Failed to create cache directory")?;
    }
    let cache = WeatherCache::open(
        &config.weather.cache_path,
        config.cache_ttl(),
        config.weather.coordinate_precision,
    )?;
    info!(path = %config.weather.cache_path, "snapshot cache opened");

    let client = OpenWeatherClient::new(config.weather.api_key.clone())?;
    let service = WeatherService::new(client, cache);
    let app = create_router(AppState::new(service));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Skycast listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Skycast shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
