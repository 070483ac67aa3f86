//! # Engine Context and Coordination Facade
//!
//! [`TideEngine`] is the "build once, query many" context: the station
//! catalog and the model map, loaded at startup and immutable afterwards.
//! [`TideEngine::coordinate`] is the engine's only public entry point for
//! the surrounding pipeline — it composes resolver → predictor into the
//! normalized [`TideSummary`] record.
//!
//! The summary's JSON shape is a compatibility surface: the pipeline
//! embeds it verbatim into downstream GeoJSON feature properties, so the
//! camelCase field names and `null` markers must not change.

use crate::cache::{self, ModelMap};
use crate::config::Config;
use crate::store::{Station, StationStore};
use crate::{predictor, resolver, EngineError};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// The facade's output record. Each field is a water level in meters or
/// `null` when no usable prediction exists; `null` is distinct from a
/// genuine zero tide.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TideSummary {
    #[serde(rename = "minimumTide")]
    pub minimum_tide: Option<f64>,
    #[serde(rename = "maximumTide")]
    pub maximum_tide: Option<f64>,
    #[serde(rename = "currentTide")]
    pub current_tide: Option<f64>,
}

impl TideSummary {
    /// The all-null record used for every "no data" path.
    pub fn empty() -> Self {
        TideSummary {
            minimum_tide: None,
            maximum_tide: None,
            current_tide: None,
        }
    }
}

/// Immutable prediction context: catalog + models. Safe for concurrent
/// readers once constructed.
pub struct TideEngine {
    stations: Vec<Station>,
    models: ModelMap,
}

impl TideEngine {
    /// Load the catalog and the model cache. Fatal if the store is
    /// unavailable — without a catalog the engine cannot serve anything.
    pub async fn open(config: &Config) -> Result<Self, EngineError> {
        let store = StationStore::open(&config.store).await?;
        let stations = store.load_stations().await?;
        let models = cache::load_or_build(Path::new(&config.model.cache_path), &store).await?;
        info!(
            stations = stations.len(),
            fitted = models.values().filter(|m| m.is_some()).count(),
            "tide engine ready"
        );
        Ok(TideEngine { stations, models })
    }

    /// Assemble an engine from preloaded parts. Intended for embedding and
    /// tests; `stations` must be ordered by id for deterministic
    /// resolution.
    pub fn from_parts(stations: Vec<Station>, models: ModelMap) -> Self {
        TideEngine { stations, models }
    }

    /// Predict the tide at a coordinate. Never fails: unresolvable
    /// coordinates, stations without models, and synthesis errors all
    /// come back as the all-null summary.
    pub fn coordinate(&self, lat: f64, lon: f64, dtg: Option<&str>) -> TideSummary {
        let Some(station) = resolver::nearest_station(&self.stations, lat, lon) else {
            return TideSummary::empty();
        };

        let model = self.models.get(&station.id).and_then(|m| m.as_ref());
        match predictor::predict(model, dtg) {
            Some(p) => TideSummary {
                minimum_tide: Some(p.min_m),
                maximum_tide: Some(p.max_m),
                current_tide: Some(p.current_m),
            },
            None => TideSummary::empty(),
        }
    }
}
