use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::geojson::{Feature, Geometry};
use crate::WithId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Kinematics {
    /// Speed over ground in knots.
    pub speed: Option<f64>,
    /// Heading in degrees, `[0, 360)`.
    pub heading: Option<f64>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VesselMetadata {
    pub name: Option<String>,
    /// AIS ship and cargo type code.
    #[serde(rename = "type")]
    pub ship_type: Option<u32>,
    pub destination: Option<String>,
}

/// Best-known telemetry of one vessel, keyed by its MMSI.
///
/// Position reports and static data arrive independently; each field group
/// remembers when it was last written so that a late report never overwrites
/// newer data of the same group.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vessel {
    pub position: Option<Position>,
    pub kinematics: Kinematics,
    pub metadata: VesselMetadata,
    pub last_updated: DateTime<Utc>,
    #[serde(skip)]
    position_updated: Option<DateTime<Utc>>,
    #[serde(skip)]
    static_updated: Option<DateTime<Utc>>,
}

impl HasId for Vessel {
    type IdType = u32;
}

#[derive(Debug, Clone, PartialEq)]
pub enum VesselReport {
    Position {
        position: Position,
        speed: Option<f64>,
        heading: Option<f64>,
    },
    Static {
        name: Option<String>,
        ship_type: Option<u32>,
        destination: Option<String>,
    },
}

/// One decoded subscription message, ready to be merged into the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselUpdate {
    pub mmsi: Id<Vessel>,
    pub timestamp: DateTime<Utc>,
    pub report: VesselReport,
}

impl Vessel {
    pub fn from_update(update: &VesselUpdate) -> Self {
        let mut vessel = Self {
            position: None,
            kinematics: Kinematics::default(),
            metadata: VesselMetadata::default(),
            last_updated: update.timestamp,
            position_updated: None,
            static_updated: None,
        };
        vessel.apply(update);
        vessel
    }

    /// Merges the fields carried by `update` into this record. Returns `false`
    /// if the record already holds newer data for that field group.
    pub fn apply(&mut self, update: &VesselUpdate) -> bool {
        let timestamp = update.timestamp;
        match &update.report {
            VesselReport::Position {
                position,
                speed,
                heading,
            } => {
                if self.position_updated.is_some_and(|last| last > timestamp) {
                    return false;
                }
                self.position = Some(*position);
                self.kinematics = Kinematics {
                    speed: *speed,
                    heading: *heading,
                };
                self.position_updated = Some(timestamp);
            }
            VesselReport::Static {
                name,
                ship_type,
                destination,
            } => {
                if self.static_updated.is_some_and(|last| last > timestamp) {
                    return false;
                }
                self.metadata = VesselMetadata {
                    name: name.clone().or(self.metadata.name.take()),
                    ship_type: ship_type.or(self.metadata.ship_type),
                    destination: destination
                        .clone()
                        .or(self.metadata.destination.take()),
                };
                self.static_updated = Some(timestamp);
            }
        }
        self.last_updated = self.last_updated.max(timestamp);
        true
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VesselProperties {
    pub mmsi: Id<Vessel>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub ship_type: Option<u32>,
    pub destination: Option<String>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub last_updated: DateTime<Utc>,
}

impl WithId<Vessel> {
    /// Vessels only known from static data have no geometry and yield `None`.
    pub fn to_feature(&self) -> Option<Feature<VesselProperties>> {
        let position = self.content.position?;
        Some(Feature::new(
            Geometry::point(position.lat, position.lon),
            VesselProperties {
                mmsi: self.id,
                name: self.content.metadata.name.clone(),
                ship_type: self.content.metadata.ship_type,
                destination: self.content.metadata.destination.clone(),
                speed: self.content.kinematics.speed,
                heading: self.content.kinematics.heading,
                last_updated: self.content.last_updated,
            },
        ))
    }
}
