//! # Julian Date Conversion
//!
//! The phase model works on a continuous day count (the Julian date, day
//! boundary at noon). This module converts between that scale and
//! `DateTime<Utc>`, which is treated purely as milliseconds since the Unix
//! epoch. No timezone offset ever enters the arithmetic.
//!
//! `to_instant` is the exact algebraic inverse of `from_instant`, so a
//! round trip is lossless to the millisecond.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{JD_UNIX_EPOCH, MS_PER_DAY};
use crate::error::{LuneError, Result};

/// Julian date of an instant.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use lune::julian::from_instant;
///
/// let epoch = DateTime::from_timestamp_millis(0).unwrap();
/// assert_eq!(from_instant(epoch), 2_440_587.5);
/// ```
pub fn from_instant(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MS_PER_DAY + JD_UNIX_EPOCH
}

/// Instant of a Julian date, rounded to the nearest millisecond.
///
/// Fails with [`LuneError::OutOfRange`] for a non-finite day count or one
/// that lies outside the range chrono can represent.
pub fn to_instant(jd: f64) -> Result<DateTime<Utc>> {
    if !jd.is_finite() {
        return Err(LuneError::OutOfRange(jd));
    }
    instant_from_millis((jd - JD_UNIX_EPOCH) * MS_PER_DAY)
}

/// Build an instant from a raw (possibly fractional) millisecond count.
pub fn instant_from_millis(ms: f64) -> Result<DateTime<Utc>> {
    if !ms.is_finite() {
        return Err(LuneError::OutOfRange(ms));
    }
    let rounded = ms.round();
    if rounded.abs() >= i64::MAX as f64 {
        return Err(LuneError::OutOfRange(ms));
    }
    DateTime::from_timestamp_millis(rounded as i64).ok_or(LuneError::OutOfRange(ms))
}

/// Parse user-supplied time text into an instant.
///
/// Accepted forms:
/// - RFC 3339 with offset: `2014-11-01T06:26:00-04:00`
/// - naive date-time read as UTC: `2014-11-01T10:26`, `2014-11-01 10:26:00`
/// - bare date, midnight UTC: `2014-11-01`
/// - epoch milliseconds: `@1415312577000`
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();

    if let Some(ms) = text.strip_prefix('@') {
        let ms: f64 = ms
            .parse()
            .map_err(|_| LuneError::InvalidArgument(format!("bad epoch milliseconds: {text}")))?;
        return instant_from_millis(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(LuneError::InvalidArgument(format!(
        "unrecognised date/time: {text:?}"
    )))
}
