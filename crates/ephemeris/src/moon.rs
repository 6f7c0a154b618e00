//! Low precision lunar coordinates (Astronomical Almanac, section D):
//! about 0.3° in longitude, 0.2° in latitude.

use utility::geo::{normalize_degrees, to_degrees, to_radians};

use crate::{sun::obliquity_degrees, time::centuries_since_j2000, Equatorial};

/// Equatorial radius of the earth as used by the parallax series.
const EARTH_RADIUS_KM: f64 = 6378.14;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPosition {
    pub ecliptic_longitude: f64,
    pub ecliptic_latitude: f64,
    pub distance_km: f64,
    pub equatorial: Equatorial,
}

fn sin_deg(degrees: f64) -> f64 {
    to_radians(degrees).sin()
}

fn cos_deg(degrees: f64) -> f64 {
    to_radians(degrees).cos()
}

pub fn moon_position(jd: f64) -> MoonPosition {
    let t = centuries_since_j2000(jd);

    let longitude = normalize_degrees(
        218.32 + 481_267.881 * t + 6.29 * sin_deg(135.0 + 477_198.87 * t)
            - 1.27 * sin_deg(259.3 - 413_335.36 * t)
            + 0.66 * sin_deg(235.7 + 890_534.22 * t)
            + 0.21 * sin_deg(269.9 + 954_397.74 * t)
            - 0.19 * sin_deg(357.5 + 35_999.05 * t)
            - 0.11 * sin_deg(186.5 + 966_404.03 * t),
    );
    let latitude = 5.13 * sin_deg(93.3 + 483_202.02 * t)
        + 0.28 * sin_deg(228.2 + 960_400.89 * t)
        - 0.28 * sin_deg(318.3 + 6_003.15 * t)
        - 0.17 * sin_deg(217.6 - 407_332.21 * t);
    let parallax = 0.9508
        + 0.0518 * cos_deg(134.9 + 477_198.85 * t)
        + 0.0095 * cos_deg(259.2 - 413_335.38 * t)
        + 0.0078 * cos_deg(235.7 + 890_534.23 * t)
        + 0.0028 * cos_deg(269.9 + 954_397.70 * t);

    let obliquity = to_radians(obliquity_degrees(jd));
    let lambda = to_radians(longitude);
    let beta = to_radians(latitude);
    let right_ascension = (lambda.sin() * obliquity.cos() - beta.tan() * obliquity.sin())
        .atan2(lambda.cos());
    let declination = (beta.sin() * obliquity.cos()
        + beta.cos() * obliquity.sin() * lambda.sin())
    .asin();

    MoonPosition {
        ecliptic_longitude: longitude,
        ecliptic_latitude: latitude,
        distance_km: EARTH_RADIUS_KM / sin_deg(parallax),
        equatorial: Equatorial {
            right_ascension: normalize_degrees(to_degrees(right_ascension)),
            declination: to_degrees(declination),
        },
    }
}
