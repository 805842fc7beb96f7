//! Kepler's equation for the two-body model.
//!
//! Solves `E - e·sin(E) = M` for the eccentric anomaly `E` by Newton
//! iteration. Converges in a handful of steps for planetary
//! eccentricities; the iteration budget only guards against constant
//! defects.

use crate::angles::fix_angle;
use crate::constants::{KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE};
use crate::error::{LuneError, Result};

/// Eccentric anomaly, in radians, for a mean anomaly given in degrees.
///
/// # Errors
/// - [`LuneError::InvalidArgument`] if the eccentricity is not in `[0, 1)`
///   or the mean anomaly is not finite.
/// - [`LuneError::NonConvergence`] if the residual is still above
///   tolerance after the iteration budget.
pub fn solve_kepler(mean_anomaly_deg: f64, eccentricity: f64) -> Result<f64> {
    if !mean_anomaly_deg.is_finite() {
        return Err(LuneError::InvalidArgument(format!(
            "mean anomaly must be finite, got {mean_anomaly_deg}"
        )));
    }
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(LuneError::InvalidArgument(format!(
            "eccentricity must be in [0, 1), got {eccentricity}"
        )));
    }

    let m = fix_angle(mean_anomaly_deg).to_radians();
    let mut e = m;
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = e - eccentricity * e.sin() - m;
        e -= delta / (1.0 - eccentricity * e.cos());
        if delta.abs() <= KEPLER_TOLERANCE {
            return Ok(e);
        }
    }

    Err(LuneError::NonConvergence {
        what: "Kepler's equation",
        iterations: KEPLER_MAX_ITERATIONS,
    })
}
