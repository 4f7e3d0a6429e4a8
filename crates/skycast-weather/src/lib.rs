//! Weather aggregation core for the Skycast dashboard.
//!
//! Fetches current conditions, air quality and a short-range forecast from
//! OpenWeather, caches normalized snapshots in SQLite, and derives
//! lifestyle insights from them.

pub mod cache;
pub mod client;
pub mod error;
pub mod insights;
pub mod service;
pub mod types;

pub use cache::WeatherCache;
pub use client::OpenWeatherClient;
pub use error::WeatherError;
pub use insights::{compute_insights, LifestyleInsights, LifestyleScores};
pub use service::WeatherService;
pub use types::{ForecastPoint, WeatherSnapshot};
