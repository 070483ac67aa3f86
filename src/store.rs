//! # Station/Observation Store
//!
//! Durable relational storage for the station catalog and its historical
//! water-level series, backed by a single sqlite file with two tables:
//!
//! ```text
//! stations(id INTEGER PRIMARY KEY, lat, lon, cos_lat, sin_lat,
//!          cos_lon, sin_lon, station TEXT)
//! observations(station TEXT, date TEXT, mm REAL)
//! ```
//!
//! The trig scalars are computed once at insert time so the nearest-station
//! scan never recomputes them. `date` is hourly text in `YYYY-MM-DD-HH`
//! form. The store is written only by the importer; the prediction path
//! treats it as read-only and loads the catalog once at startup.
//!
//! When [`StoreConfig::in_memory`] is set, the whole file is copied into a
//! `:memory:` database over a single pooled connection — the explicit
//! configuration-flag form of "load the DB into RAM if every worker can
//! afford it".

use crate::config::StoreConfig;
use crate::EngineError;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// A catalog station with its precomputed trigonometric scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Catalog-unique station identifier.
    pub id: String,
    /// WGS84 latitude in degrees.
    pub lat: f64,
    /// WGS84 longitude in degrees.
    pub lon: f64,
    pub sin_lat: f64,
    pub cos_lat: f64,
    pub sin_lon: f64,
    pub cos_lon: f64,
}

impl Station {
    /// Build a station, deriving the trig scalars from lat/lon so the two
    /// can never disagree.
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
        Station {
            id: id.into(),
            lat,
            lon,
            sin_lat,
            cos_lat,
            sin_lon,
            cos_lon,
        }
    }
}

/// Parse an observation timestamp in the store's hourly `YYYY-MM-DD-HH`
/// text form. Returns `None` for anything else; a malformed date anywhere
/// in a station's series makes that station unfittable rather than raising.
pub fn parse_hourly_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{s}-00"), "%Y-%m-%d-%H-%M").ok()
}

/// Handle on the sqlite station/observation store.
pub struct StationStore {
    pool: SqlitePool,
}

impl StationStore {
    /// Open an existing store for prediction. A missing or unopenable
    /// store file is a fatal startup error.
    pub async fn open(cfg: &StoreConfig) -> Result<Self, EngineError> {
        // sqlite will happily create an empty database on open; check the
        // file ourselves so a misconfigured path fails loudly instead.
        std::fs::metadata(&cfg.path)?;

        if cfg.in_memory {
            return Self::open_in_memory(&cfg.path).await;
        }

        let opts = SqliteConnectOptions::new()
            .filename(&cfg.path)
            .create_if_missing(false);
        let pool = SqlitePool::connect_with(opts).await?;
        Ok(StationStore { pool })
    }

    /// Create a fresh store file for the importer.
    pub async fn create(path: &Path) -> Result<Self, EngineError> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opts).await?;
        Ok(StationStore { pool })
    }

    /// Copy the store file into a `:memory:` database. The pool is pinned
    /// to one connection; each sqlite connection gets its own memory
    /// database, so a second connection would see nothing.
    async fn open_in_memory(path: &str) -> Result<Self, EngineError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        let attach = format!("ATTACH DATABASE '{}' AS src", path.replace('\'', "''"));
        sqlx::query(&attach).execute(&pool).await?;
        sqlx::query("CREATE TABLE stations AS SELECT * FROM src.stations")
            .execute(&pool)
            .await?;
        sqlx::query("CREATE TABLE observations AS SELECT * FROM src.observations")
            .execute(&pool)
            .await?;
        sqlx::query("DETACH DATABASE src").execute(&pool).await?;

        Ok(StationStore { pool })
    }

    /// Create the two tables. Fails if they already exist: re-importing
    /// into a used store is an explicit caller error, not a merge.
    pub async fn init_schema(&self) -> Result<(), EngineError> {
        sqlx::query(
            "CREATE TABLE stations (
                 id INTEGER PRIMARY KEY,
                 lat REAL,
                 lon REAL,
                 cos_lat REAL,
                 sin_lat REAL,
                 cos_lon REAL,
                 sin_lon REAL,
                 station TEXT
             )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE TABLE observations (
                 station TEXT,
                 date TEXT,
                 mm REAL
             )",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX idx_observations_station ON observations (station, date)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_station(&self, station: &Station) -> Result<(), EngineError> {
        sqlx::query(
            "INSERT INTO stations (lat, lon, cos_lat, sin_lat, cos_lon, sin_lon, station)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(station.lat)
        .bind(station.lon)
        .bind(station.cos_lat)
        .bind(station.sin_lat)
        .bind(station.cos_lon)
        .bind(station.sin_lon)
        .bind(&station.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_observation(
        &self,
        station_id: &str,
        date: &str,
        mm: f64,
    ) -> Result<(), EngineError> {
        sqlx::query("INSERT INTO observations (station, date, mm) VALUES (?, ?, ?)")
            .bind(station_id)
            .bind(date)
            .bind(mm)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The full catalog, ordered by station id. Ordering matters: the
    /// resolver's tie-break relies on it.
    pub async fn load_stations(&self) -> Result<Vec<Station>, EngineError> {
        let rows = sqlx::query(
            "SELECT station, lat, lon, sin_lat, cos_lat, sin_lon, cos_lon
             FROM stations ORDER BY station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Station {
                id: r.get("station"),
                lat: r.get("lat"),
                lon: r.get("lon"),
                sin_lat: r.get("sin_lat"),
                cos_lat: r.get("cos_lat"),
                sin_lon: r.get("sin_lon"),
                cos_lon: r.get("cos_lon"),
            })
            .collect())
    }

    /// All station ids, ordered. Used by the cache rebuild.
    pub async fn station_ids(&self) -> Result<Vec<String>, EngineError> {
        let rows = sqlx::query("SELECT station FROM stations ORDER BY station")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("station")).collect())
    }

    /// A station's historical series as raw `(date, mm)` rows, ordered by
    /// date. Empty for unknown stations. Dates stay text here so a single
    /// malformed row degrades the station to "no model" downstream instead
    /// of losing the whole store load.
    pub async fn observation_rows(
        &self,
        station_id: &str,
    ) -> Result<Vec<(String, f64)>, EngineError> {
        let rows = sqlx::query(
            "SELECT date, mm FROM observations WHERE station = ? ORDER BY date",
        )
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(|r| (r.get("date"), r.get("mm"))).collect())
    }
}
