//! SQLite-backed cache of normalized weather snapshots.
//!
//! One row per rounded coordinate pair, overwritten in place on every
//! successful fetch. Rows older than the freshness window act as misses and
//! stay behind until the next overwrite reclaims them; the table never
//! shrinks on its own.

use std::path::Path;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::WeatherError;
use crate::types::WeatherSnapshot;

/// Default freshness window for cached snapshots.
pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

/// Default coordinate rounding in decimal places. Two decimals is roughly
/// 1.1 km, so nearby requests share a row.
pub const DEFAULT_COORD_PRECISION: usize = 2;

/// SQLite cache for weather snapshots, shared across request handlers.
pub struct WeatherCache {
    conn: Mutex<Connection>,
    ttl: Duration,
    precision: usize,
}

impl WeatherCache {
    /// Open (or create) the cache database at the given path.
    pub fn open<P: AsRef<Path>>(
        path: P,
        ttl: Duration,
        precision: usize,
    ) -> Result<Self, WeatherError> {
        Self::from_connection(Connection::open(path)?, ttl, precision)
    }

    /// In-memory cache for tests.
    #[cfg(test)]
    pub fn in_memory(ttl: Duration, precision: usize) -> Result<Self, WeatherError> {
        Self::from_connection(Connection::open_in_memory()?, ttl, precision)
    }

    fn from_connection(
        conn: Connection,
        ttl: Duration,
        precision: usize,
    ) -> Result<Self, WeatherError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS weather_cache (
                key TEXT PRIMARY KEY,
                lat REAL NOT NULL,
                lon REAL NOT NULL,
                payload TEXT NOT NULL,
                fetched_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
            precision,
        })
    }

    /// Cache key for a coordinate pair: both axes rounded to the configured
    /// number of decimal places.
    fn key(&self, lat: f64, lon: f64) -> String {
        format!("{lat:.prec$}_{lon:.prec$}", prec = self.precision)
    }

    /// Snapshot for a location, if one is stored and still fresh.
    ///
    /// A stale row behaves exactly like a missing one; it is not deleted.
    /// Storage and payload failures propagate instead of reading as misses.
    pub fn get(&self, lat: f64, lon: f64) -> Result<Option<WeatherSnapshot>, WeatherError> {
        let key = self.key(lat, lon);
        let row: Option<(String, i64)> = self
            .conn
            .lock()
            .query_row(
                "SELECT payload, fetched_at FROM weather_cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((payload, fetched_at)) = row else {
            return Ok(None);
        };

        let age_ms = chrono::Utc::now().timestamp_millis() - fetched_at;
        if age_ms >= self.ttl.as_millis() as i64 {
            return Ok(None);
        }

        let snapshot = serde_json::from_str(&payload)
            .map_err(|e| WeatherError::Cache(format!("corrupt cache payload: {e}")))?;
        Ok(Some(snapshot))
    }

    /// Store or overwrite the snapshot for a location with the current
    /// timestamp.
    pub fn put(&self, lat: f64, lon: f64, snapshot: &WeatherSnapshot) -> Result<(), WeatherError> {
        let key = self.key(lat, lon);
        let payload = serde_json::to_string(snapshot)
            .map_err(|e| WeatherError::Cache(format!("failed to encode snapshot: {e}")))?;
        let now = chrono::Utc::now().timestamp_millis();

        self.conn.lock().execute(
            "INSERT OR REPLACE INTO weather_cache (key, lat, lon, payload, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key, lat, lon, payload, now],
        )?;
        Ok(())
    }
}
