//! Low precision positions of the sun and moon, good to a fraction of a
//! degree over several centuries around J2000, and the quantities derived
//! from them for the map: sub-points, the day/night boundary and the lunar
//! phase.

use std::{error, fmt};

use chrono::{DateTime, Utc};
use model::celestial::{GeoPoint, MoonInfo, Subpoints};
use utility::geo::{normalize_longitude, to_degrees, to_radians};

pub mod moon;
pub mod phase;
pub mod sun;
pub mod terminator;
pub mod time;

pub use terminator::{night_polygon, terminator, TerminatorLine, DEFAULT_STEP};

/// Geocentric equatorial coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub right_ascension: f64,
    pub declination: f64,
}

impl Equatorial {
    /// The point on the surface where this body stands in the zenith.
    pub fn subpoint(&self, gmst: f64) -> GeoPoint {
        GeoPoint::new(
            self.declination,
            normalize_longitude(self.right_ascension - gmst),
        )
    }

    /// Altitude above the horizon in degrees as seen from a surface point,
    /// ignoring parallax and refraction.
    pub fn altitude(&self, latitude: f64, longitude: f64, gmst: f64) -> f64 {
        let hour_angle = to_radians(gmst + longitude - self.right_ascension);
        let (phi, delta) = (to_radians(latitude), to_radians(self.declination));
        let sin_altitude = phi.sin() * delta.sin() + phi.cos() * delta.cos() * hour_angle.cos();
        to_degrees(sin_altitude.clamp(-1.0, 1.0).asin())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    InvalidStep(f64),
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidStep(step) => write!(
                f,
                "Longitude step must be a positive number of degrees up to 360, got {}.",
                step
            ),
        }
    }
}

impl error::Error for SamplingError {}

pub fn subpoints(t: &DateTime<Utc>) -> Subpoints {
    let jd = time::julian_date(t);
    let gmst = time::gmst_degrees(jd);
    Subpoints {
        timestamp: *t,
        sun: sun::sun_position(jd).equatorial.subpoint(gmst),
        moon: moon::moon_position(jd).equatorial.subpoint(gmst),
    }
}

pub fn moon_info(t: &DateTime<Utc>) -> MoonInfo {
    let jd = time::julian_date(t);
    let gmst = time::gmst_degrees(jd);
    let (sun, moon) = (sun::sun_position(jd), moon::moon_position(jd));
    let subpoint = moon.equatorial.subpoint(gmst);
    let angle = phase::phase_angle(&sun, &moon);
    MoonInfo {
        timestamp: *t,
        lat: subpoint.lat,
        lon: subpoint.lon,
        phase: phase::classify(angle),
        phase_angle: angle,
        illumination: phase::illumination(&sun, &moon),
    }
}
