//! Julian dates and sidereal time.
//!
//! UT1 is approximated by UTC and TT by UT1. The resulting error (about a
//! minute of time) is far below the precision of the low-order series used
//! for the sun and the moon.

use chrono::{DateTime, Utc};
use utility::geo::normalize_degrees;

/// J2000 epoch in Julian days
pub const J2000: f64 = 2_451_545.0;

/// Julian date of 1970-01-01T00:00:00Z
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

pub const DAYS_PER_CENTURY: f64 = 36_525.0;

pub fn julian_date(t: &DateTime<Utc>) -> f64 {
    let seconds = t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Days since J2000.
pub fn days_since_j2000(jd: f64) -> f64 {
    jd - J2000
}

/// Julian centuries since J2000.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    days_since_j2000(jd) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees, `[0, 360)`.
pub fn gmst_degrees(jd: f64) -> f64 {
    let d = days_since_j2000(jd);
    let t = centuries_since_j2000(jd);
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}
