//! # Model Cache
//!
//! Memoizes the full station→model mapping to a single JSON artifact so
//! the expensive least-squares decomposition runs once per observation
//! history. The artifact is a build product, never a source of truth: any
//! read or parse failure falls back to a full rebuild from the store, and
//! the fresh mapping is persisted before being returned.
//!
//! There is no automatic invalidation. If the observation history changes,
//! the operator deletes the artifact to force a rebuild; a stale cache is
//! an accepted, documented limitation.

use crate::harmonics::{self, HarmonicModel};
use crate::store::{parse_hourly_date, StationStore};
use crate::{EngineError, Observation};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Station id → harmonic model, `None` marking stations with no usable fit.
pub type ModelMap = HashMap<String, Option<HarmonicModel>>;

/// Fit a model for every catalog station. Stations with no observations,
/// a malformed date anywhere in their series, or an unfittable series map
/// to `None` without error.
pub async fn build_all(store: &StationStore) -> Result<ModelMap, EngineError> {
    let mut models = ModelMap::new();
    for id in store.station_ids().await? {
        let rows = store.observation_rows(&id).await?;
        let parsed: Option<Vec<Observation>> = rows
            .iter()
            .map(|(date, mm)| parse_hourly_date(date).map(|t| (t, *mm)))
            .collect();
        let model = parsed.as_deref().and_then(harmonics::fit);
        debug!(
            station = %id,
            observations = rows.len(),
            fitted = model.is_some(),
            "harmonic decomposition"
        );
        models.insert(id, model);
    }
    Ok(models)
}

/// Return the cached mapping at `path`, or rebuild it from the store and
/// persist the result. Correctness never depends on the cache being
/// present; it is purely a speed optimization.
pub async fn load_or_build(path: &Path, store: &StationStore) -> Result<ModelMap, EngineError> {
    match read_artifact(path) {
        Ok(models) => {
            debug!("loaded {} station models from {}", models.len(), path.display());
            return Ok(models);
        }
        Err(e) => info!("model cache unavailable ({e}); rebuilding"),
    }

    let models = build_all(store).await?;
    // a failed write costs the next run a rebuild, nothing more
    if let Err(e) = write_artifact(path, &models) {
        warn!("could not persist model cache to {}: {e}", path.display());
    }
    Ok(models)
}

fn read_artifact(path: &Path) -> Result<ModelMap, EngineError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_artifact(path: &Path, models: &ModelMap) -> Result<(), EngineError> {
    let bytes = serde_json::to_vec(models)?;
    fs::write(path, bytes)?;
    Ok(())
}
