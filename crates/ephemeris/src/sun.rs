//! Low precision solar coordinates (Astronomical Almanac, section C),
//! good to about 0.01° between 1950 and 2050.

use utility::geo::{normalize_degrees, to_degrees, to_radians};

use crate::{time::days_since_j2000, Equatorial};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Apparent ecliptic longitude in degrees.
    pub ecliptic_longitude: f64,
    /// Distance from the earth in astronomical units.
    pub distance_au: f64,
    pub equatorial: Equatorial,
}

pub fn sun_position(jd: f64) -> SunPosition {
    let n = days_since_j2000(jd);
    let mean_longitude = normalize_degrees(280.460 + 0.985_647_4 * n);
    let mean_anomaly = to_radians(normalize_degrees(357.528 + 0.985_600_3 * n));

    let longitude = normalize_degrees(
        mean_longitude
            + 1.915 * mean_anomaly.sin()
            + 0.020 * (2.0 * mean_anomaly).sin(),
    );
    let distance_au = 1.000_14
        - 0.016_71 * mean_anomaly.cos()
        - 0.000_14 * (2.0 * mean_anomaly).cos();

    let obliquity = to_radians(obliquity_degrees(jd));
    let lambda = to_radians(longitude);
    let right_ascension = (obliquity.cos() * lambda.sin()).atan2(lambda.cos());
    let declination = (obliquity.sin() * lambda.sin()).asin();

    SunPosition {
        ecliptic_longitude: longitude,
        distance_au,
        equatorial: Equatorial {
            right_ascension: normalize_degrees(to_degrees(right_ascension)),
            declination: to_degrees(declination),
        },
    }
}

/// Mean obliquity of the ecliptic in degrees.
pub fn obliquity_degrees(jd: f64) -> f64 {
    23.439 - 0.000_000_4 * days_since_j2000(jd)
}
