//! # Tidal Constituent Catalog
//!
//! The fixed set of named astronomical tidal frequencies the harmonic
//! builder fits against. These are the 37 constituents NOAA publishes for
//! its harmonic stations, with angular speeds in degrees per mean solar
//! hour. The catalog is static: observed tides at any station are treated
//! as a superposition of exactly these frequencies plus a mean offset.
//!
//! Speeds are what identify a constituent; amplitudes and phases are per
//! station and live in [`crate::harmonics::HarmonicModel`].

use std::f64::consts::PI;

/// A named tidal frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constituent {
    /// Darwin symbol, e.g. "M2", "K1".
    pub name: &'static str,
    /// Angular speed in degrees per mean solar hour.
    pub speed_deg_hr: f64,
}

impl Constituent {
    /// Angular frequency ω in radians per hour.
    pub fn angular_frequency(&self) -> f64 {
        self.speed_deg_hr * PI / 180.0
    }

    /// Period in hours (2π/ω).
    pub fn period_hours(&self) -> f64 {
        360.0 / self.speed_deg_hr
    }
}

/// The NOAA 37-constituent set, dominant semidiurnal terms first.
pub static CONSTITUENTS: &[Constituent] = &[
    Constituent { name: "M2", speed_deg_hr: 28.984_104_2 },
    Constituent { name: "S2", speed_deg_hr: 30.0 },
    Constituent { name: "N2", speed_deg_hr: 28.439_729_5 },
    Constituent { name: "K2", speed_deg_hr: 30.082_137_3 },
    Constituent { name: "L2", speed_deg_hr: 29.528_478_9 },
    Constituent { name: "T2", speed_deg_hr: 29.958_933_3 },
    Constituent { name: "R2", speed_deg_hr: 30.041_066_7 },
    Constituent { name: "NU2", speed_deg_hr: 28.512_583_1 },
    Constituent { name: "MU2", speed_deg_hr: 27.968_208_4 },
    Constituent { name: "2N2", speed_deg_hr: 27.895_354_8 },
    Constituent { name: "LAM2", speed_deg_hr: 29.455_625_3 },
    Constituent { name: "2SM2", speed_deg_hr: 31.015_895_8 },
    Constituent { name: "K1", speed_deg_hr: 15.041_068_6 },
    Constituent { name: "O1", speed_deg_hr: 13.943_035_6 },
    Constituent { name: "P1", speed_deg_hr: 14.958_931_4 },
    Constituent { name: "Q1", speed_deg_hr: 13.398_660_9 },
    Constituent { name: "S1", speed_deg_hr: 15.0 },
    Constituent { name: "M1", speed_deg_hr: 14.496_693_9 },
    Constituent { name: "J1", speed_deg_hr: 15.585_443_3 },
    Constituent { name: "RHO1", speed_deg_hr: 13.471_514_5 },
    Constituent { name: "OO1", speed_deg_hr: 16.139_101_7 },
    Constituent { name: "2Q1", speed_deg_hr: 12.854_286_2 },
    Constituent { name: "M3", speed_deg_hr: 43.476_156_3 },
    Constituent { name: "M4", speed_deg_hr: 57.968_208_4 },
    Constituent { name: "M6", speed_deg_hr: 86.952_312_7 },
    Constituent { name: "M8", speed_deg_hr: 115.936_416_6 },
    Constituent { name: "S4", speed_deg_hr: 60.0 },
    Constituent { name: "S6", speed_deg_hr: 90.0 },
    Constituent { name: "MK3", speed_deg_hr: 44.025_172_9 },
    Constituent { name: "2MK3", speed_deg_hr: 42.927_139_8 },
    Constituent { name: "MN4", speed_deg_hr: 57.423_833_7 },
    Constituent { name: "MS4", speed_deg_hr: 58.984_104_2 },
    Constituent { name: "MF", speed_deg_hr: 1.098_033_1 },
    Constituent { name: "MM", speed_deg_hr: 0.544_374_7 },
    Constituent { name: "MSF", speed_deg_hr: 1.015_895_8 },
    Constituent { name: "SSA", speed_deg_hr: 0.082_137_3 },
    Constituent { name: "SA", speed_deg_hr: 0.041_068_6 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_full_noaa_set() {
        assert_eq!(CONSTITUENTS.len(), 37);
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for c in CONSTITUENTS {
            assert!(seen.insert(c.name), "duplicate constituent '{}'", c.name);
        }
    }

    #[test]
    fn speeds_are_positive_and_distinct() {
        for c in CONSTITUENTS {
            assert!(c.speed_deg_hr > 0.0, "{} has non-positive speed", c.name);
        }
        for (i, a) in CONSTITUENTS.iter().enumerate() {
            for b in &CONSTITUENTS[i + 1..] {
                assert!(
                    (a.speed_deg_hr - b.speed_deg_hr).abs() > 1e-9,
                    "{} and {} share a speed",
                    a.name,
                    b.name
                );
            }
        }
    }

    #[test]
    fn m2_period_is_the_lunar_semidiurnal_half_day() {
        let m2 = CONSTITUENTS.iter().find(|c| c.name == "M2").unwrap();
        assert!((m2.period_hours() - 12.42).abs() < 0.01);
    }

    #[test]
    fn angular_frequency_matches_speed() {
        let s2 = CONSTITUENTS.iter().find(|c| c.name == "S2").unwrap();
        // 30 deg/hr -> one full cycle per 12 h -> pi/6 rad/hr
        assert!((s2.angular_frequency() - PI / 6.0).abs() < 1e-12);
    }
}
