use chrono::{DateTime, Utc};
use model::{
    celestial::{NightProperties, SubsolarSample},
    geojson::{Feature, Geometry, Position},
};

use crate::{sun::sun_position, time::julian_date, Equatorial, SamplingError};

/// Longitude step of the terminator line served by default.
pub const DEFAULT_STEP: f64 = 2.0;

/// Bisection steps per longitude, bounding the error to 180° / 2^10.
pub const SEARCH_ITERATIONS: usize = 10;

/// Latitude spacing of the vertices added along the map edges when closing
/// the night polygon.
const EDGE_STEP: f64 = 10.0;

/// Lazily evaluated day/night boundary for one instant, sampled west to east
/// from -180° to 180° inclusive.
#[derive(Debug, Clone)]
pub struct TerminatorLine {
    sun: Equatorial,
    gmst: f64,
    step: f64,
    next: usize,
    count: usize,
}

impl TerminatorLine {
    pub fn new(t: &DateTime<Utc>, step: f64) -> Result<Self, SamplingError> {
        if !step.is_finite() || step <= 0.0 || step > 360.0 {
            return Err(SamplingError::InvalidStep(step));
        }
        let jd = julian_date(t);
        Ok(Self {
            sun: sun_position(jd).equatorial,
            gmst: crate::time::gmst_degrees(jd),
            step,
            next: 0,
            // tolerate rounding so that 360 / step lands on the closing meridian
            count: (360.0 / step + 1e-9).floor() as usize + 1,
        })
    }

    /// Solar altitude in degrees at a surface point.
    pub fn solar_altitude(&self, latitude: f64, longitude: f64) -> f64 {
        self.sun.altitude(latitude, longitude, self.gmst)
    }

    /// Bisects the latitude at which the sun crosses the horizon along the
    /// given meridian. Whether the day side lies north or south of the
    /// crossing is read off the south pole.
    pub fn locate_latitude(&self, longitude: f64) -> f64 {
        let day_is_north = self.solar_altitude(-90.0, longitude) <= 0.0;
        let (mut lower, mut upper) = (-90.0, 90.0);
        let mut middle = 0.0;
        for _ in 0..SEARCH_ITERATIONS {
            middle = (lower + upper) / 2.0;
            let altitude = self.solar_altitude(middle, longitude);
            if (altitude > 0.0) == day_is_north {
                upper = middle;
            } else {
                lower = middle;
            }
        }
        middle
    }

    /// The pole that currently sees no sun; `-90.0` for the south pole.
    pub fn dark_pole(&self) -> f64 {
        if self.sun.declination >= 0.0 {
            -90.0
        } else {
            90.0
        }
    }
}

impl Iterator for TerminatorLine {
    type Item = SubsolarSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let longitude = -180.0 + self.next as f64 * self.step;
        self.next += 1;
        Some(SubsolarSample {
            longitude,
            latitude: self.locate_latitude(longitude),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TerminatorLine {}

pub fn terminator(t: &DateTime<Utc>, step: f64) -> Result<TerminatorLine, SamplingError> {
    TerminatorLine::new(t, step)
}

/// The night side as a closed polygon: the terminator line, then down the
/// eastern map edge to the dark pole, across, and back up the western edge.
pub fn night_polygon(
    t: &DateTime<Utc>,
    step: f64,
) -> Result<Feature<NightProperties>, SamplingError> {
    let line = TerminatorLine::new(t, step)?;
    let atlantic_is_day = line.solar_altitude(0.0, 0.0) > 0.0;
    let pole = line.dark_pole();
    let samples = line.clone().collect::<Vec<_>>();

    let mut ring: Vec<Position> = samples
        .iter()
        .map(|sample| [sample.longitude, sample.latitude])
        .collect();
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Err(SamplingError::InvalidStep(step));
    };

    ring.extend(edge(last.latitude, pole).map(|latitude| [180.0, latitude]));
    ring.push([180.0, pole]);
    ring.push([-180.0, pole]);
    ring.extend(
        edge(first.latitude, pole)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(|latitude| [-180.0, latitude]),
    );
    ring.push([first.longitude, first.latitude]);

    Ok(Feature::new(
        Geometry::Polygon {
            coordinates: vec![ring],
        },
        NightProperties {
            timestamp: *t,
            atlantic_is_day,
        },
    ))
}

/// Whole multiples of `EDGE_STEP` strictly between `from` and `pole`,
/// ordered from `from` towards the pole.
fn edge(from: f64, pole: f64) -> impl Iterator<Item = f64> {
    let direction = pole.signum();
    let start = if direction < 0.0 {
        (from / EDGE_STEP).floor()
    } else {
        (from / EDGE_STEP).ceil()
    } as i64;
    let end = (pole / EDGE_STEP) as i64;
    let count = (end - start).unsigned_abs();
    (0..count)
        .map(move |i| (start as f64 + direction * i as f64) * EDGE_STEP)
        .filter(move |latitude| (latitude - from) * direction > 0.0)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn instants() -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        // spread over a year and over the time of day
        (0..48)
            .map(|i| start + Duration::hours(i * 24 * 7 + i * 5))
            .collect()
    }

    #[test]
    fn default_sampling_yields_181_points() {
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let line = terminator(&t, DEFAULT_STEP).unwrap();
        assert_eq!(line.len(), 181);

        let samples = line.collect::<Vec<_>>();
        assert_eq!(samples.len(), 181);
        assert_eq!(samples[0].longitude, -180.0);
        assert_eq!(samples[90].longitude, 0.0);
        assert_eq!(samples[180].longitude, 180.0);
    }

    #[test]
    fn crossing_is_within_search_tolerance() {
        for t in instants() {
            let line = terminator(&t, DEFAULT_STEP).unwrap();
            let probe = line.clone();
            for sample in line {
                assert!((-90.0..=90.0).contains(&sample.latitude));
                let altitude = probe.solar_altitude(sample.latitude, sample.longitude);
                assert!(
                    altitude.abs() < 0.2,
                    "altitude {altitude} at {sample:?} for {t}"
                );
            }
        }
    }

    #[test]
    fn rejects_invalid_steps() {
        let t = Utc::now();
        for step in [0.0, -2.0, f64::NAN, f64::INFINITY, 361.0] {
            assert!(terminator(&t, step).is_err(), "step {step}");
        }
        assert_eq!(terminator(&t, 360.0).unwrap().count(), 2);
        assert_eq!(terminator(&t, 0.5).unwrap().count(), 721);
    }

    #[test]
    fn night_polygon_is_closed_and_reaches_dark_pole() {
        let t = Utc.with_ymd_and_hms(2024, 6, 21, 0, 0, 0).unwrap();
        let feature = night_polygon(&t, DEFAULT_STEP).unwrap();
        let Geometry::Polygon { coordinates } = feature.geometry else {
            panic!("expected polygon");
        };
        let ring = &coordinates[0];
        assert_eq!(ring.first(), ring.last());
        // northern summer: the south pole is dark
        assert!(ring.contains(&[180.0, -90.0]));
        assert!(ring.contains(&[-180.0, -90.0]));
        // midnight UTC: the sun is over the pacific
        assert!(!feature.properties.atlantic_is_day);
    }

    #[test]
    fn edge_steps_towards_pole() {
        assert_eq!(edge(12.3, -90.0).collect::<Vec<_>>(), vec![
            10.0, 0.0, -10.0, -20.0, -30.0, -40.0, -50.0, -60.0, -70.0, -80.0
        ]);
        assert_eq!(edge(75.0, 90.0).collect::<Vec<_>>(), vec![80.0]);
        assert_eq!(edge(80.0, 90.0).collect::<Vec<_>>(), Vec::<f64>::new());
    }
}
