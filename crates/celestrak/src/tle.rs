use chrono::{DateTime, Utc};
use model::celestial::GeoPoint;
use sgp4::{Constants, Elements};
use utility::geo::ecef_to_geodetic;

use crate::TleError;

/// NORAD catalog number of the International Space Station.
pub const ISS_NORAD_ID: u64 = 25544;

/// Used whenever no fresh `stations` group has been fetched.
pub const ISS_FALLBACK_TLE: [&str; 3] = [
    "ISS (ZARYA)",
    "1 25544U 98067A   24100.67873843  .00003578  00000+0  73447-4 0  9994",
    "2 25544  51.6384 104.1685 0004321 305.4353 182.5320 15.50086897439957",
];

/// A parsed element set, ready for propagation.
pub struct Satellite {
    pub name: String,
    pub elements: Elements,
    constants: Constants,
}

impl Satellite {
    pub fn from_tle(name: &str, line1: &str, line2: &str) -> Result<Self, TleError> {
        let elements =
            Elements::from_tle(Some(name.to_owned()), line1.as_bytes(), line2.as_bytes())
                .map_err(|e| TleError::ParseError(format!("{}: {}", name, e)))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| TleError::ParseError(format!("{}: {}", name, e)))?;
        Ok(Self {
            name: name.to_owned(),
            elements,
            constants,
        })
    }

    pub fn iss_fallback() -> Result<Self, TleError> {
        let [name, line1, line2] = ISS_FALLBACK_TLE;
        Self::from_tle(name, line1, line2)
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Ground point below the satellite at `t`.
    pub fn subpoint(&self, t: &DateTime<Utc>) -> Result<GeoPoint, TleError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&t.naive_utc())
            .map_err(|e| TleError::PropagationError(format!("{}: {}", self.name, e)))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| TleError::PropagationError(format!("{}: {}", self.name, e)))?;

        // TEME to earth fixed, rotating by sidereal time
        let theta = utility::geo::to_radians(ephemeris::time::gmst_degrees(
            ephemeris::time::julian_date(t),
        ));
        let (cos, sin) = (theta.cos(), theta.sin());
        let [x, y, z] = prediction.position;
        let (latitude, longitude, _) = ecef_to_geodetic(cos * x + sin * y, -sin * x + cos * y, z);
        Ok(GeoPoint::new(latitude, longitude))
    }
}

/// Parses three-line element sets. Entries that are incomplete or fail to
/// parse are skipped.
pub fn parse_tle(text: &str) -> Vec<Satellite> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();

    let mut satellites = Vec::with_capacity(lines.len() / 3);
    let mut index = 0;
    while index < lines.len() {
        // resynchronize on the next name line if an entry is broken
        let entry = &lines[index..lines.len().min(index + 3)];
        match entry {
            [name, line1, line2] if line1.starts_with("1 ") && line2.starts_with("2 ") => {
                match Satellite::from_tle(name, line1, line2) {
                    Ok(satellite) => satellites.push(satellite),
                    Err(why) => log::debug!("skipping element set: {}", why),
                }
                index += 3;
            }
            _ => {
                log::debug!("skipping incomplete element set at line {}", index);
                index += 1;
            }
        }
    }
    satellites
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    const HUBBLE: [&str; 3] = [
        "HST",
        "1 20580U 90037B   24100.51296769  .00011181  00000+0  39872-3 0  9999",
        "2 20580  28.4697 103.7936 0004548 207.2519 152.7824 15.26916599  2980",
    ];

    #[test]
    fn fallback_stays_within_orbital_inclination() {
        let iss = Satellite::iss_fallback().unwrap();
        assert_eq!(iss.norad_id(), ISS_NORAD_ID);

        let epoch = Utc.with_ymd_and_hms(2024, 4, 9, 16, 17, 22).unwrap();
        for minutes in (0..180).step_by(7) {
            let point = iss.subpoint(&(epoch + Duration::minutes(minutes))).unwrap();
            assert!(point.lat.abs() <= 52.0, "{:?}", point);
            assert!((-180.0..180.0).contains(&point.lon), "{:?}", point);
        }
    }

    #[test]
    fn parses_named_entries_and_skips_broken_ones() {
        let text = [
            ISS_FALLBACK_TLE.join("\r\n"),
            "BROKEN\n1 garbage".to_owned(),
            HUBBLE.join("\n"),
            "DANGLING NAME".to_owned(),
        ]
        .join("\n");

        let satellites = parse_tle(&text);
        let names = satellites.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["ISS (ZARYA)", "HST"]);
    }

    #[test]
    fn empty_feed_yields_no_satellites() {
        assert!(parse_tle("").is_empty());
        assert!(parse_tle("No GP data found").is_empty());
    }
}
