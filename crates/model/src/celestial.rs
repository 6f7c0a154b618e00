use std::fmt;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use crate::ExampleData;

/// A point on the earth's surface in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One vertex of the day/night boundary. Serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, JsonSchema)]
pub struct SubsolarSample {
    pub longitude: f64,
    pub latitude: f64,
}

impl Serialize for SubsolarSample {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [self.longitude, self.latitude].serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Subpoints {
    pub timestamp: DateTime<Utc>,
    pub sun: GeoPoint,
    pub moon: GeoPoint,
}

impl ExampleData for Subpoints {
    fn example_data() -> Self {
        Self {
            timestamp: DateTime::default(),
            sun: GeoPoint::new(-23.01, 178.97),
            moon: GeoPoint::new(18.2, -64.5),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Terminator {
    pub terminator: Vec<SubsolarSample>,
    pub timestamp: DateTime<Utc>,
}

/// The eight named lunar phases, each covering 45° of moon-sun elongation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    /// Elongation in degrees at which this phase is exact.
    pub fn center(&self) -> f64 {
        Self::ALL
            .iter()
            .position(|phase| phase == self)
            .map(|index| index as f64 * 45.0)
            .unwrap_or_default()
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoonInfo {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub phase: MoonPhase,
    /// Moon minus sun ecliptic longitude, `[0, 360)`.
    pub phase_angle: f64,
    /// Illuminated fraction of the disc in percent, one decimal.
    pub illumination: f64,
}

impl ExampleData for MoonInfo {
    fn example_data() -> Self {
        Self {
            timestamp: DateTime::default(),
            lat: 18.2,
            lon: -64.5,
            phase: MoonPhase::WaxingGibbous,
            phase_angle: 131.4,
            illumination: 83.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NightProperties {
    pub timestamp: DateTime<Utc>,
    pub atlantic_is_day: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn samples_serialize_lon_first() {
        let sample = SubsolarSample {
            longitude: -180.0,
            latitude: 12.5,
        };
        assert_eq!(serde_json::to_value(sample).unwrap(), json!([-180.0, 12.5]));
    }

    #[test]
    fn phase_centers_are_45_degrees_apart() {
        assert_eq!(MoonPhase::NewMoon.center(), 0.0);
        assert_eq!(MoonPhase::FirstQuarter.center(), 90.0);
        assert_eq!(MoonPhase::FullMoon.center(), 180.0);
        assert_eq!(MoonPhase::LastQuarter.center(), 270.0);
    }

    #[test]
    fn phases_serialize_as_display_names() {
        assert_eq!(
            serde_json::to_value(MoonPhase::WaningGibbous).unwrap(),
            json!("Waning Gibbous")
        );
    }
}
