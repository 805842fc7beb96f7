//! # Astronomical Constants
//!
//! Every fixed number the phase model needs lives here. Angles are in
//! degrees, distances in kilometres, times in days unless the name says
//! otherwise.

/// Synodic month (new Moon to new Moon), in days.
pub const SYNODIC_MONTH: f64 = 29.530_588_68;

/// Milliseconds in one day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Julian date of the Unix epoch (1970-01-01T00:00Z).
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Days in a Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

// ---- Moon & Sun sizes ----------------------------------------------------

/// Semi-major axis of the Moon's orbit.
pub const MOON_SMAXIS: f64 = 384_401.0;
/// Moon's angular size at distance `MOON_SMAXIS` from Earth.
pub const MOON_ANGULAR_SIZE: f64 = 0.5181;
/// Semi-major axis of Earth's orbit.
pub const SUN_SMAXIS: f64 = 1.495_85e8;
/// Sun's angular size at distance `SUN_SMAXIS`.
pub const SUN_ANGULAR_SIZE_SMAXIS: f64 = 0.533_128;

// ---- Orbital elements, epoch 1980.0 --------------------------------------

/// 1980 January 0.0, as a Julian date.
pub const EPOCH_1980: f64 = 2_444_238.5;
/// Length of the tropical year, in days.
pub const TROPICAL_YEAR: f64 = 365.2422;
/// Ecliptic longitude of the Sun at the epoch.
pub const SUN_LONGITUDE_EPOCH: f64 = 278.833_540;
/// Ecliptic longitude of the Sun at perigee.
pub const SUN_LONGITUDE_PERIGEE: f64 = 282.596_403;
/// Eccentricity of Earth's orbit.
pub const EARTH_ECCENTRICITY: f64 = 0.016_718;
/// Moon's mean longitude at the epoch.
pub const MOON_LONGITUDE_EPOCH: f64 = 64.975_464;
/// Mean longitude of the lunar perigee at the epoch.
pub const MOON_PERIGEE_EPOCH: f64 = 349.383_063;
/// Eccentricity of the Moon's orbit.
pub const MOON_ECCENTRICITY: f64 = 0.054_900;
/// Daily motion of the Moon's mean longitude.
pub const MOON_DAILY_MOTION: f64 = 13.176_396_6;
/// Daily motion of the lunar perigee.
pub const PERIGEE_DAILY_MOTION: f64 = 0.111_404_1;

// ---- Quarter-phase series ------------------------------------------------

/// Epoch of the lunation series, 1900 January 0.5.
pub const LUNATION_SERIES_EPOCH: f64 = 2_415_020.0;
/// Mean new Moon of lunation 0 of the series.
pub const LUNATION_ZERO_NEW_MOON: f64 = 2_415_020.759_33;
/// Lunations per Julian century.
pub const LUNATIONS_PER_CENTURY: f64 = 1236.85;
/// Lunations per tropical year, for coarse index estimates.
pub const LUNATIONS_PER_YEAR: f64 = 12.3685;
/// Base year of the coarse lunation index estimate.
pub const LUNATION_BASE_YEAR: f64 = 1900.0;
/// Base date of E. W. Brown's numbered lunations (1923 January 16).
pub const BROWN_LUNATIONS_BASE: f64 = 2_423_436.0;

/// Days to step back before seeding a lunation index estimate.
pub const HUNT_LOOKBACK_DAYS: i64 = 45;

// ---- Iteration limits ----------------------------------------------------

/// Newton iteration budget for Kepler's equation.
pub const KEPLER_MAX_ITERATIONS: usize = 100;
/// Convergence threshold for Kepler's equation, in radians.
pub const KEPLER_TOLERANCE: f64 = 1e-6;
/// Budget for any single lunation search loop.
pub const SEARCH_MAX_ITERATIONS: usize = 64;
