//! # Window Predictor
//!
//! Synthesizes water levels from a station's harmonic model over a fixed
//! 10-day forward window at 6-minute resolution (0.1-hour steps, 240 per
//! day) and reduces it to (min, max, current). The first grid point sits
//! exactly at the reference time, so `current` is the level at the moment
//! asked about.
//!
//! Reference times are minute-resolution text (`YYYY-MM-DD-HH-mm`). When
//! no time is given, wall-clock "now" is formatted to that form and
//! re-parsed — sub-minute precision is deliberately dropped so the
//! explicit-time and default-time paths behave identically.
//!
//! Levels come out of the model in millimeters and are converted to meters
//! here. Every failure — absent model, malformed timestamp, non-finite
//! synthesis — collapses to `None`; nothing escapes to the facade.

use crate::harmonics::HarmonicModel;
use chrono::{Duration, Local, NaiveDateTime};

/// Reference-time text format, minute resolution.
pub const DTG_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Grid points in the synthesis window: 10 days at 240 steps/day.
const WINDOW_STEPS: i64 = 10 * 240;

/// Seconds per 0.1-hour grid step.
const STEP_SECONDS: i64 = 360;

/// Summary of a synthesized window, all levels in meters.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub min_m: f64,
    pub max_m: f64,
    pub current_m: f64,
    /// The reference time actually used (parsed, minute resolution).
    pub reference_time: NaiveDateTime,
}

/// Predict (min, max, current) for `model` starting at `dtg`, or at the
/// current wall-clock minute when `dtg` is `None`.
pub fn predict(model: Option<&HarmonicModel>, dtg: Option<&str>) -> Option<Prediction> {
    let t0 = match dtg {
        Some(text) => NaiveDateTime::parse_from_str(text, DTG_FORMAT).ok()?,
        None => {
            let rendered = Local::now().naive_local().format(DTG_FORMAT).to_string();
            NaiveDateTime::parse_from_str(&rendered, DTG_FORMAT).ok()?
        }
    };
    let model = model?;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut current = 0.0;
    for step in 0..WINDOW_STEPS {
        let level = model.height_at(t0 + Duration::seconds(step * STEP_SECONDS));
        if step == 0 {
            current = level;
        }
        min = min.min(level);
        max = max.max(level);
    }
    if !min.is_finite() || !max.is_finite() || !current.is_finite() {
        return None;
    }

    Some(Prediction {
        min_m: min / 1000.0,
        max_m: max / 1000.0,
        current_m: current / 1000.0,
        reference_time: t0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonics::FittedConstituent;

    fn flat_model(mean_mm: f64) -> HarmonicModel {
        HarmonicModel {
            epoch: NaiveDateTime::parse_from_str("2019-01-01-00-00", DTG_FORMAT).unwrap(),
            mean_mm,
            constituents: vec![],
        }
    }

    fn m2_model(mean_mm: f64, amplitude_mm: f64) -> HarmonicModel {
        HarmonicModel {
            epoch: NaiveDateTime::parse_from_str("2019-01-01-00-00", DTG_FORMAT).unwrap(),
            mean_mm,
            constituents: vec![FittedConstituent {
                name: "M2".to_string(),
                speed_deg_hr: 28.984_104_2,
                amplitude_mm,
                phase_rad: 0.0,
            }],
        }
    }

    #[test]
    fn absent_model_predicts_nothing() {
        assert!(predict(None, Some("2020-01-01-00-00")).is_none());
    }

    #[test]
    fn malformed_reference_time_predicts_nothing() {
        let model = m2_model(5000.0, 1200.0);
        assert!(predict(Some(&model), Some("2020-01-01")).is_none());
        assert!(predict(Some(&model), Some("not-a-time")).is_none());
        assert!(predict(Some(&model), Some("2020-01-01 00:00")).is_none());
    }

    #[test]
    fn raw_levels_convert_to_meters() {
        // a constituent-free model synthesizes its mean everywhere
        let p = predict(Some(&flat_model(2500.0)), Some("2020-01-01-00-00")).unwrap();
        assert_eq!(p.current_m, 2.5);
        assert_eq!(p.min_m, 2.5);
        assert_eq!(p.max_m, 2.5);
    }

    #[test]
    fn current_is_the_level_at_the_reference_time() {
        let model = m2_model(5000.0, 1200.0);
        let p = predict(Some(&model), Some("2020-03-01-06-30")).unwrap();
        let t0 = NaiveDateTime::parse_from_str("2020-03-01-06-30", DTG_FORMAT).unwrap();
        assert_eq!(p.reference_time, t0);
        assert!((p.current_m - model.height_at(t0) / 1000.0).abs() < 1e-12);
    }

    #[test]
    fn window_extrema_bracket_the_m2_range() {
        let model = m2_model(5000.0, 1200.0);
        let p = predict(Some(&model), Some("2020-01-01-00-00")).unwrap();
        // 10 days covers many M2 cycles; extrema approach mean ± amplitude
        assert!(p.min_m <= p.current_m && p.current_m <= p.max_m);
        assert!((p.min_m - 3.8).abs() < 0.01, "min {}", p.min_m);
        assert!((p.max_m - 6.2).abs() < 0.01, "max {}", p.max_m);
    }

    #[test]
    fn min_never_exceeds_max() {
        let model = m2_model(0.0, 700.0);
        let p = predict(Some(&model), Some("2021-07-15-17-45")).unwrap();
        assert!(p.min_m <= p.max_m);
    }

    #[test]
    fn default_reference_time_has_minute_resolution() {
        let model = flat_model(1000.0);
        let p = predict(Some(&model), None).unwrap();
        assert_eq!(p.reference_time.format("%S").to_string(), "00");
    }
}
