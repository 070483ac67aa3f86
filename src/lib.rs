//! # Tidecast Core Library
//!
//! Tidecast predicts tidal water levels at arbitrary geographic points and
//! timestamps using a fixed catalog of tide-gauge stations with known
//! historical water-level series. It is a library-grade computational
//! engine: the surrounding shoreline pipeline feeds it a coordinate and an
//! optional timestamp, and gets back a current/min/max tide summary to
//! stamp onto detected shoreline features.
//!
//! ## Pipeline
//!
//! 1. **Import** (offline, rare): raw per-station CSV files are parsed into
//!    a sqlite store of stations and hourly observations ([`importer`]).
//! 2. **Startup**: the station catalog is loaded from the store and a
//!    harmonic model per station is either deserialized from the model
//!    cache artifact or rebuilt by least-squares decomposition ([`store`],
//!    [`cache`], [`harmonics`]).
//! 3. **Query**: a latitude/longitude resolves to the nearest station by
//!    great-circle proximity, the station's model synthesizes a 10-day
//!    window of levels, and the facade reduces it to
//!    `{minimumTide, maximumTide, currentTide}` ([`resolver`],
//!    [`predictor`], [`engine`]).
//!
//! ## Failure policy
//!
//! Anything that would produce an incomplete-but-plausible tide estimate is
//! suppressed in favor of an explicit `null` field in the output: invalid
//! coordinates, stations without enough history to fit, singular fits, and
//! malformed timestamps all surface as `None`, never as panics or errors.
//! Only infrastructure failures that leave the engine without a usable
//! catalog at all (missing store, unreadable import directory) are fatal,
//! and those propagate as [`EngineError`].

use chrono::NaiveDateTime;
use thiserror::Error;

pub mod cache;
pub mod config;
pub mod constituents;
pub mod engine;
pub mod harmonics;
pub mod importer;
pub mod predictor;
pub mod resolver;
pub mod store;

/// A single historical water-level observation: hourly timestamp and level
/// in millimeters, as stored in the observation table.
pub type Observation = (NaiveDateTime, f64);

/// Infrastructure errors that prevent the engine from having a usable
/// catalog. Per-request failures (bad coordinates, unfittable stations,
/// malformed timestamps) never appear here; they resolve to `None`/`null`
/// values inside the prediction path instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Station/observation store unavailable or a query failed.
    #[error("station store: {0}")]
    Store(#[from] sqlx::Error),

    /// Filesystem problem while importing or persisting the model cache.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// A station-definition file could not be read as CSV.
    #[error("import: {0}")]
    Import(#[from] csv::Error),

    /// The model cache artifact could not be encoded or decoded.
    #[error("model cache: {0}")]
    Cache(#[from] serde_json::Error),
}
