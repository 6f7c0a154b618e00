use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

use crate::geojson::{Feature, Geometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum VolcanoStatus {
    Active,
    Erupting,
    Restless,
    #[serde(rename = "New Activity")]
    NewActivity,
    #[serde(rename = "Ongoing Activity")]
    OngoingActivity,
}

/// Weekly activity report mentioning a volcano.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ActivityReport {
    pub title: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Volcano {
    pub name: String,
    pub location: String,
    pub status: VolcanoStatus,
    pub report: Option<ActivityReport>,
    #[serde(skip)]
    pub latitude: f64,
    #[serde(skip)]
    pub longitude: f64,
}

impl Volcano {
    pub fn to_feature(&self) -> Feature<Volcano> {
        Feature::new(Geometry::point(self.latitude, self.longitude), self.clone())
    }
}
