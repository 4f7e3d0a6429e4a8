//! Shared application state for the HTTP server.

use std::sync::Arc;

use skycast_weather::WeatherService;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

impl AppState {
    pub fn new(service: WeatherService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
