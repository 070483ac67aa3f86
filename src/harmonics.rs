//! # Harmonic Model Builder
//!
//! Decomposes a station's historical water-level series into the fixed
//! catalog of tidal constituents by linear least squares. The observed
//! level is modeled as
//!
//! ```text
//! h(t) = mean + Σᵢ Aᵢ·cos(ωᵢ·t − φᵢ)
//! ```
//!
//! where `t` is elapsed hours since the series' first observation (the
//! model's reference epoch), `ωᵢ` are the catalog frequencies, and the
//! amplitudes `Aᵢ` and phases `φᵢ` are recovered from the fit. Writing
//! each term as `aᵢ·cos(ωᵢt) + bᵢ·sin(ωᵢt)` makes the system linear in
//! the unknowns; it is solved by SVD with small-singular-value truncation,
//! which keeps near-degenerate constituent pairs (SA/SSA on short records,
//! S2/K2/T2/R2) from blowing up the solution.
//!
//! Fitting is the expensive step — O(n·k²) for n observations and k
//! constituents — which is why [`crate::cache`] memoizes the result to
//! disk. A station whose series is empty, too short to identify the
//! constituents, or numerically unfittable yields `None`, never an error.

use crate::constituents::CONSTITUENTS;
use crate::Observation;
use chrono::NaiveDateTime;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Singular values below this fraction of the largest are truncated.
const SVD_EPS: f64 = 1e-10;

/// Fewest observations that can identify the full constituent set: one
/// (amplitude, phase) pair per constituent plus the mean level.
pub fn min_observations() -> usize {
    2 * CONSTITUENTS.len() + 1
}

/// One fitted constituent. The speed is carried alongside the name so a
/// cached model stays self-contained even if the catalog ordering changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedConstituent {
    pub name: String,
    /// Angular speed in degrees per hour.
    pub speed_deg_hr: f64,
    /// Amplitude in millimeters.
    pub amplitude_mm: f64,
    /// Phase lag in radians relative to the model epoch.
    pub phase_rad: f64,
}

/// A station's harmonic decomposition: everything needed to synthesize a
/// water level at any timestamp. Immutable after construction; built once
/// per station at cache-build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicModel {
    /// Time origin the phases are defined against (first observation).
    pub epoch: NaiveDateTime,
    /// Mean water level in millimeters.
    pub mean_mm: f64,
    pub constituents: Vec<FittedConstituent>,
}

impl HarmonicModel {
    /// Synthesized water level in millimeters at `t`.
    pub fn height_at(&self, t: NaiveDateTime) -> f64 {
        let hours = elapsed_hours(self.epoch, t);
        let mut level = self.mean_mm;
        for c in &self.constituents {
            let omega = c.speed_deg_hr.to_radians();
            level += c.amplitude_mm * (omega * hours - c.phase_rad).cos();
        }
        level
    }
}

fn elapsed_hours(epoch: NaiveDateTime, t: NaiveDateTime) -> f64 {
    (t - epoch).num_seconds() as f64 / 3600.0
}

/// Fit a harmonic model to an ordered observation series.
///
/// Returns `None` when the series is empty, shorter than
/// [`min_observations`], or the least-squares solve fails — callers treat
/// that as "this station has no usable model".
pub fn fit(observations: &[Observation]) -> Option<HarmonicModel> {
    if observations.len() < min_observations() {
        return None;
    }

    let epoch = observations[0].0;
    let n = observations.len();
    let k = CONSTITUENTS.len();

    let hours: Vec<f64> = observations
        .iter()
        .map(|(t, _)| elapsed_hours(epoch, *t))
        .collect();

    // Columns: [1, cos(ω₀t), sin(ω₀t), cos(ω₁t), sin(ω₁t), ...]
    let design = DMatrix::from_fn(n, 2 * k + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            let theta = CONSTITUENTS[(j - 1) / 2].angular_frequency() * hours[i];
            if (j - 1) % 2 == 0 {
                theta.cos()
            } else {
                theta.sin()
            }
        }
    });
    let levels = DVector::from_iterator(n, observations.iter().map(|(_, mm)| *mm));

    let svd = design.svd(true, true);
    let coeffs = svd.solve(&levels, SVD_EPS).ok()?;
    if coeffs.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let constituents = CONSTITUENTS
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let a = coeffs[1 + 2 * i];
            let b = coeffs[2 + 2 * i];
            FittedConstituent {
                name: c.name.to_string(),
                speed_deg_hr: c.speed_deg_hr,
                amplitude_mm: a.hypot(b),
                phase_rad: b.atan2(a),
            }
        })
        .collect();

    Some(HarmonicModel {
        epoch,
        mean_mm: coeffs[0],
        constituents,
    })
}
