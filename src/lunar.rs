//! Moon-phase & low-precision lunar/solar ephemeris.
//!
//! Two-body model from epoch 1980.0 orbital elements (Duffett-Smith,
//! *Practical Astronomy with your Calculator*, as used by John Walker's
//! moontool). The Sun's true anomaly comes from Kepler's equation; the
//! Moon's longitude gets the evection, annual equation, equation of the
//! centre and variation corrections.
//! Accuracy: ~0.001 in phase, well under 1 % in distance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::angles::{cos_deg, fix_angle, sin_deg};
use crate::constants::{
    EARTH_ECCENTRICITY, EPOCH_1980, MOON_ANGULAR_SIZE, MOON_DAILY_MOTION, MOON_ECCENTRICITY,
    MOON_LONGITUDE_EPOCH, MOON_PERIGEE_EPOCH, MOON_SMAXIS, PERIGEE_DAILY_MOTION,
    SUN_ANGULAR_SIZE_SMAXIS, SUN_LONGITUDE_EPOCH, SUN_LONGITUDE_PERIGEE, SUN_SMAXIS,
    SYNODIC_MONTH, TROPICAL_YEAR,
};
use crate::error::Result;
use crate::julian::from_instant;
use crate::kepler::solve_kepler;

/// Everything the instantaneous phase routine computes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSnapshot {
    /// Fraction of the current lunation, 0 = new, 0.5 = full, wraps at 1.
    pub phase: f64,
    /// Illuminated fraction of the disk (0–1).
    pub illuminated: f64,
    /// Days since the last new Moon.
    pub age: f64,
    /// Earth–Moon distance in km.
    pub distance: f64,
    /// Apparent lunar diameter in degrees.
    pub angular_diameter: f64,
    /// Earth–Sun distance in km.
    pub sun_distance: f64,
    /// Apparent solar diameter in degrees.
    pub sun_angular_diameter: f64,
}

const PHASE_NAMES: [&str; 8] = [
    "New Moon",
    "Waxing Crescent",
    "First Quarter",
    "Waxing Gibbous",
    "Full Moon",
    "Waning Gibbous",
    "Last Quarter",
    "Waning Crescent",
];

impl PhaseSnapshot {
    /// Phase octant 0 – 7 (0 = new, 4 = full), rounded to the nearest.
    pub fn phase_index(&self) -> u8 {
        ((self.phase * 8.0) + 0.5).floor() as u8 & 7
    }

    /// Conventional English name of the phase octant.
    pub fn phase_name(&self) -> &'static str {
        PHASE_NAMES[self.phase_index() as usize]
    }
}

/// Compute the lunar phase snapshot for `at`, or for now if `None`.
///
/// # Errors
/// [`crate::LuneError::NonConvergence`] if Kepler's equation for the Sun
/// does not converge, which only a constant defect can cause.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use lune::lunar::phase;
///
/// let full = Utc.with_ymd_and_hms(1989, 1, 21, 21, 33, 0).unwrap();
/// let snap = phase(Some(full)).unwrap();
/// assert!((snap.phase - 0.5).abs() < 0.001);
/// assert_eq!(snap.phase_name(), "Full Moon");
/// ```
pub fn phase(at: Option<DateTime<Utc>>) -> Result<PhaseSnapshot> {
    let at = at.unwrap_or_else(Utc::now);

    // ---------- 1. Days since epoch 1980.0 ------------------------------------
    let day = from_instant(at) - EPOCH_1980;

    // ---------- 2. Sun position -----------------------------------------------
    let sun_mean_anomaly =
        fix_angle((360.0 / TROPICAL_YEAR) * day + SUN_LONGITUDE_EPOCH - SUN_LONGITUDE_PERIGEE);
    let ecc_anomaly = solve_kepler(sun_mean_anomaly, EARTH_ECCENTRICITY)?;
    let sun_true_anomaly = 2.0
        * (((1.0 + EARTH_ECCENTRICITY) / (1.0 - EARTH_ECCENTRICITY)).sqrt()
            * (0.5 * ecc_anomaly).tan())
        .atan()
        .to_degrees();
    let sun_longitude = fix_angle(sun_true_anomaly + SUN_LONGITUDE_PERIGEE);
    // orbital distance factor, a / r
    let sun_factor = (1.0 + EARTH_ECCENTRICITY * cos_deg(sun_true_anomaly))
        / (1.0 - EARTH_ECCENTRICITY * EARTH_ECCENTRICITY);
    let sun_distance = SUN_SMAXIS / sun_factor;

    // ---------- 3. Moon position ----------------------------------------------
    let mean_longitude = fix_angle(MOON_DAILY_MOTION * day + MOON_LONGITUDE_EPOCH);
    let mean_anomaly = fix_angle(mean_longitude - PERIGEE_DAILY_MOTION * day - MOON_PERIGEE_EPOCH);

    let evection = 1.2739 * sin_deg(2.0 * (mean_longitude - sun_longitude) - mean_anomaly);
    let annual_equation = 0.1858 * sin_deg(sun_mean_anomaly);
    let third_correction = 0.37 * sin_deg(sun_mean_anomaly);
    let corrected_anomaly = mean_anomaly + evection - annual_equation - third_correction;
    let equation_of_centre = 6.2886 * sin_deg(corrected_anomaly);
    let fourth_correction = 0.214 * sin_deg(2.0 * corrected_anomaly);
    let corrected_longitude =
        mean_longitude + evection + equation_of_centre - annual_equation + fourth_correction;
    let variation = 0.6583 * sin_deg(2.0 * (corrected_longitude - sun_longitude));
    let true_longitude = corrected_longitude + variation;

    // ---------- 4. Phase & illumination ----------------------------------------
    let age_angle = true_longitude - sun_longitude;
    let illuminated = (1.0 - cos_deg(age_angle)) / 2.0;

    let mut phase = fix_angle(age_angle) / 360.0;
    phase -= phase.floor();

    // ---------- 5. Lunar distance -----------------------------------------------
    let distance = MOON_SMAXIS * (1.0 - MOON_ECCENTRICITY * MOON_ECCENTRICITY)
        / (1.0 + MOON_ECCENTRICITY * cos_deg(corrected_anomaly + equation_of_centre));

    Ok(PhaseSnapshot {
        phase,
        illuminated,
        age: phase * SYNODIC_MONTH,
        distance,
        angular_diameter: MOON_ANGULAR_SIZE * MOON_SMAXIS / distance,
        sun_distance,
        sun_angular_diameter: SUN_ANGULAR_SIZE_SMAXIS * SUN_SMAXIS / sun_distance,
    })
}
