//! HTTP server for the Skycast weather dashboard.
//!
//! Exposes the aggregation core over a small REST surface and owns process
//! configuration. The binary entry point lives in `main.rs`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::create_router;
pub use state::AppState;
