use std::env;

use serde::Serialize;

pub const AISSTREAM_URL: &str = "wss://stream.aisstream.io/v0/stream";

/// Message kinds the subscription asks for.
pub const MESSAGE_TYPES: [&str; 2] = ["PositionReport", "ShipStaticData"];

/// `[[south, west], [north, east]]`
pub type BoundingBox = [[f64; 2]; 2];

pub const WHOLE_WORLD: BoundingBox = [[-90.0, -180.0], [90.0, 180.0]];

#[derive(Clone, Debug)]
pub struct AisStreamConfig {
    pub api_key: String,
    pub url: String,
    pub bounding_boxes: Vec<BoundingBox>,
}

impl AisStreamConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            url: AISSTREAM_URL.to_owned(),
            bounding_boxes: vec![WHOLE_WORLD],
        }
    }

    /// `None` without an API key; the ship feed stays disabled then.
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("AISSTREAM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        let mut config = Self::new(api_key.trim());
        if let Ok(url) = env::var("AISSTREAM_URL") {
            config.url = url;
        }
        Some(config)
    }

    pub fn subscription(&self) -> Subscription<'_> {
        Subscription {
            api_key: &self.api_key,
            bounding_boxes: &self.bounding_boxes,
            filter_message_types: &MESSAGE_TYPES,
        }
    }
}

/// First message sent after connecting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subscription<'a> {
    #[serde(rename = "APIKey")]
    pub api_key: &'a str,
    pub bounding_boxes: &'a [BoundingBox],
    pub filter_message_types: &'a [&'static str],
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn subscription_message() {
        let config = AisStreamConfig::new("secret");
        assert_eq!(
            serde_json::to_value(config.subscription()).unwrap(),
            json!({
                "APIKey": "secret",
                "BoundingBoxes": [[[-90.0, -180.0], [90.0, 180.0]]],
                "FilterMessageTypes": ["PositionReport", "ShipStaticData"]
            })
        );
    }
}
