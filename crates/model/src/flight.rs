use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::{HasId, Id};

use crate::geojson::{Feature, Geometry};
use crate::ExampleData;

/// Aircraft state as last reported to the flight tracking network.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    /// ICAO 24-bit transponder address, hex encoded.
    pub icao24: Id<Aircraft>,
    pub callsign: Option<String>,
    pub origin_country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Barometric altitude in meters, geometric altitude if unavailable.
    pub altitude: Option<f64>,
    /// Ground speed in m/s.
    pub velocity: Option<f64>,
    /// True track in degrees clockwise from north.
    pub heading: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub on_ground: bool,
    pub last_contact: Option<DateTime<Utc>>,
}

impl HasId for Aircraft {
    type IdType = String;
}

impl Aircraft {
    pub fn to_feature(&self) -> Feature<Aircraft> {
        Feature::new(Geometry::point(self.latitude, self.longitude), self.clone())
    }
}

impl ExampleData for Aircraft {
    fn example_data() -> Self {
        Self {
            icao24: Id::new("3c6444".to_owned()),
            callsign: Some("DLH9LF".to_owned()),
            origin_country: "Germany".to_owned(),
            latitude: 50.0379,
            longitude: 8.5622,
            altitude: Some(3048.0),
            velocity: Some(154.3),
            heading: Some(249.2),
            vertical_rate: Some(-4.2),
            on_ground: false,
            last_contact: None,
        }
    }
}
