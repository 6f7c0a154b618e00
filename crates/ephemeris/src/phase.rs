use model::celestial::MoonPhase;
use utility::geo::{normalize_degrees, to_radians};

use crate::{moon::MoonPosition, sun::SunPosition};

const KM_PER_AU: f64 = 149_597_870.7;

/// Width of each named phase around its center.
const PHASE_WIDTH: f64 = 45.0;

/// Moon minus sun ecliptic longitude in `[0, 360)`; 0° is new, 180° is full.
pub fn phase_angle(sun: &SunPosition, moon: &MoonPosition) -> f64 {
    normalize_degrees(moon.ecliptic_longitude - sun.ecliptic_longitude)
}

/// Maps an elongation to the phase whose 45° bucket contains it. Buckets are
/// centered on multiples of 45°, so 22.5° already counts as waxing crescent.
pub fn classify(angle: f64) -> MoonPhase {
    if !angle.is_finite() {
        return MoonPhase::NewMoon;
    }
    let shifted = normalize_degrees(angle) + PHASE_WIDTH / 2.0;
    let index = (shifted / PHASE_WIDTH).floor() as usize % MoonPhase::ALL.len();
    MoonPhase::ALL[index]
}

/// Illuminated fraction of the lunar disc in percent, rounded to one decimal.
pub fn illumination(sun: &SunPosition, moon: &MoonPosition) -> f64 {
    let delta = to_radians(moon.ecliptic_longitude - sun.ecliptic_longitude);
    let beta = to_radians(moon.ecliptic_latitude);
    let elongation = (beta.cos() * delta.cos()).clamp(-1.0, 1.0).acos();

    let sun_km = sun.distance_au * KM_PER_AU;
    let incidence =
        (sun_km * elongation.sin()).atan2(moon.distance_km - sun_km * elongation.cos());
    let fraction = (1.0 + incidence.cos()) / 2.0;
    (fraction * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{moon::moon_position, sun::sun_position, time::julian_date};

    #[test]
    fn classify_bucket_boundaries() {
        assert_eq!(classify(0.0), MoonPhase::NewMoon);
        assert_eq!(classify(22.4), MoonPhase::NewMoon);
        assert_eq!(classify(22.5), MoonPhase::WaxingCrescent);
        assert_eq!(classify(90.0), MoonPhase::FirstQuarter);
        assert_eq!(classify(180.0), MoonPhase::FullMoon);
        assert_eq!(classify(270.0), MoonPhase::LastQuarter);
        assert_eq!(classify(337.4), MoonPhase::WaningCrescent);
        assert_eq!(classify(337.5), MoonPhase::NewMoon);
        assert_eq!(classify(359.9), MoonPhase::NewMoon);
    }

    #[test]
    fn classify_is_periodic() {
        for step in 0..720 {
            let angle = step as f64 * 0.5;
            assert_eq!(classify(angle), classify(angle + 360.0), "{angle}");
            assert_eq!(classify(angle), classify(angle - 360.0), "{angle}");
        }
        assert_eq!(classify(f64::NAN), MoonPhase::NewMoon);
    }

    #[test]
    fn known_lunations() {
        // new moon, first quarter and full moon of April 2024
        let cases = [
            (Utc.with_ymd_and_hms(2024, 4, 8, 18, 21, 0).unwrap(), MoonPhase::NewMoon, 0.0),
            (Utc.with_ymd_and_hms(2024, 4, 15, 19, 13, 0).unwrap(), MoonPhase::FirstQuarter, 50.0),
            (Utc.with_ymd_and_hms(2024, 4, 23, 23, 49, 0).unwrap(), MoonPhase::FullMoon, 100.0),
        ];
        for (t, phase, lit) in cases {
            let jd = julian_date(&t);
            let (sun, moon) = (sun_position(jd), moon_position(jd));
            let angle = phase_angle(&sun, &moon);
            assert_eq!(classify(angle), phase, "{t}");
            assert!((angle - phase.center()).abs() < 2.0 || (angle - 360.0).abs() < 2.0);
            assert!((illumination(&sun, &moon) - lit).abs() < 3.0, "{t}");
        }
    }
}
