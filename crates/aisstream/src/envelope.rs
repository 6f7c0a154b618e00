//! Decoding of subscription messages into cache updates.

use std::fmt;

use chrono::{DateTime, Utc};
use model::vessel::{Position, VesselReport, VesselUpdate};
use serde::Deserialize;
use utility::{id::Id, serde::ais_time};

/// Reported instead of a heading when none is available.
const HEADING_NOT_AVAILABLE: f64 = 511.0;

/// Speeds of 102.3 knots and above mean "not available".
const SPEED_NOT_AVAILABLE: f64 = 102.3;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    message_type: String,
    #[serde(default)]
    meta_data: Option<MetaData>,
    #[serde(default)]
    message: Message,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "MMSI", default)]
    mmsi: Option<u32>,
    #[serde(deserialize_with = "ais_time::deserialize_option", default)]
    time_utc: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Message {
    position_report: Option<PositionReport>,
    ship_static_data: Option<ShipStaticData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PositionReport {
    #[serde(rename = "UserID")]
    user_id: Option<u32>,
    latitude: f64,
    longitude: f64,
    sog: Option<f64>,
    cog: Option<f64>,
    true_heading: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ShipStaticData {
    #[serde(rename = "UserID")]
    user_id: Option<u32>,
    name: Option<String>,
    #[serde(rename = "Type")]
    ship_type: Option<u32>,
    destination: Option<String>,
}

#[derive(Debug)]
pub enum DecodeError {
    Malformed(serde_json::Error),
    UnsupportedType(String),
    /// The envelope names a kind but does not carry its body.
    MissingBody(String),
    MissingIdentifier,
    InvalidPosition { lat: f64, lon: f64 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed message: {}", e),
            Self::UnsupportedType(kind) => write!(f, "unsupported message type {}", kind),
            Self::MissingBody(kind) => write!(f, "{} without body", kind),
            Self::MissingIdentifier => write!(f, "message without MMSI"),
            Self::InvalidPosition { lat, lon } => write!(f, "invalid position {}, {}", lat, lon),
        }
    }
}

/// AIS pads text fields with `@` and spaces.
fn clean_text(text: Option<String>) -> Option<String> {
    text.map(|text| text.trim_end_matches(['@', ' ']).trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn heading(report: &PositionReport) -> Option<f64> {
    report
        .true_heading
        .filter(|heading| *heading != HEADING_NOT_AVAILABLE && (0.0..360.0).contains(heading))
        .or_else(|| report.cog.filter(|cog| (0.0..360.0).contains(cog)))
}

/// Decodes one message. The timestamp is taken from the message metadata
/// and falls back to `received_at`.
pub fn decode(payload: &[u8], received_at: DateTime<Utc>) -> Result<VesselUpdate, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(payload).map_err(DecodeError::Malformed)?;
    let (meta_mmsi, timestamp) = match &envelope.meta_data {
        Some(meta) => (meta.mmsi, meta.time_utc.unwrap_or(received_at)),
        None => (None, received_at),
    };

    let (user_id, report) = match envelope.message_type.as_str() {
        "PositionReport" => {
            let report = envelope
                .message
                .position_report
                .ok_or_else(|| DecodeError::MissingBody(envelope.message_type.clone()))?;
            let (lat, lon) = (report.latitude, report.longitude);
            // 91 and 181 mean "not available"
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
                return Err(DecodeError::InvalidPosition { lat, lon });
            }
            (
                report.user_id,
                VesselReport::Position {
                    position: Position { lat, lon },
                    speed: report.sog.filter(|sog| *sog >= 0.0 && *sog < SPEED_NOT_AVAILABLE),
                    heading: heading(&report),
                },
            )
        }
        "ShipStaticData" => {
            let data = envelope
                .message
                .ship_static_data
                .ok_or_else(|| DecodeError::MissingBody(envelope.message_type.clone()))?;
            (
                data.user_id,
                VesselReport::Static {
                    name: clean_text(data.name),
                    ship_type: data.ship_type.filter(|ship_type| *ship_type != 0),
                    destination: clean_text(data.destination),
                },
            )
        }
        other => return Err(DecodeError::UnsupportedType(other.to_owned())),
    };

    let mmsi = user_id.or(meta_mmsi).ok_or(DecodeError::MissingIdentifier)?;
    Ok(VesselUpdate {
        mmsi: Id::new(mmsi),
        timestamp,
        report,
    })
}
