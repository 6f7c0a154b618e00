use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

use crate::ExampleData;

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct SatellitePosition {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SatelliteGroup {
    pub timestamp: DateTime<Utc>,
    pub satellites: Vec<SatellitePosition>,
}

impl ExampleData for SatelliteGroup {
    fn example_data() -> Self {
        Self {
            timestamp: DateTime::default(),
            satellites: vec![SatellitePosition {
                name: "STARLINK-1007".to_owned(),
                latitude: -41.27,
                longitude: 102.4,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct IssPosition {
    pub timestamp: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
}
