//! Degree-based trigonometry. All model formulas are written in degrees;
//! conversion to radians happens only here.

/// Sine of an angle given in degrees.
#[inline]
pub fn sin_deg(deg: f64) -> f64 {
    deg.to_radians().sin()
}

/// Cosine of an angle given in degrees.
#[inline]
pub fn cos_deg(deg: f64) -> f64 {
    deg.to_radians().cos()
}

/// Fold an angle into `[0, 360)`.
#[inline]
pub fn fix_angle(deg: f64) -> f64 {
    deg - 360.0 * (deg / 360.0).floor()
}
