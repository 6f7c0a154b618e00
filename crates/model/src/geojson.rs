//! The subset of GeoJSON (RFC 7946) the map front end consumes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair, GeoJSON axis order.
pub type Position = [f64; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
}

impl Geometry {
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self::Point {
            coordinates: [longitude, latitude],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature<P> {
    pub geometry: Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    pub fn empty() -> Self {
        Self { features: vec![] }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<P> FromIterator<Feature<P>> for FeatureCollection<P> {
    fn from_iter<I: IntoIterator<Item = Feature<P>>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn feature_collection_wire_format() {
        let collection: FeatureCollection<serde_json::Value> = [Feature::new(
            Geometry::point(19.4217, -155.6027),
            json!({ "name": "Mauna Loa" }),
        )]
        .into_iter()
        .collect();

        assert_eq!(
            serde_json::to_value(&collection).unwrap(),
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-155.6027, 19.4217] },
                    "properties": { "name": "Mauna Loa" }
                }]
            })
        );
    }
}
