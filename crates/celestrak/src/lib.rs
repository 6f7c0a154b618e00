use std::{error, fmt, sync::Arc};

use phf::phf_map;

pub mod catalog;
pub mod client;
pub mod collector;
pub mod tle;

pub use catalog::TleCatalog;

/// Short names used by the map front end, translated to CelesTrak group names.
pub static GROUP_ALIASES: phf::Map<&'static str, &'static str> = phf_map! {
    "iss" => "stations",
    "stations" => "stations",
    "starlink" => "starlink",
    "gps" => "gps-ops",
    "gps-ops" => "gps-ops",
    "iridium" => "iridium-NEXT",
    "iridium-next" => "iridium-NEXT",
    "galileo" => "galileo",
    "glonass" => "glo-ops",
    "oneweb" => "oneweb",
    "weather" => "weather",
};

/// Resolves a requested group to its CelesTrak name. Unknown names are passed
/// through unchanged.
pub fn canonical_group(name: &str) -> &str {
    GROUP_ALIASES
        .get(name.to_lowercase().as_str())
        .copied()
        .unwrap_or(name)
}

#[derive(Debug, Clone)]
pub enum TleError {
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
    },
    ParseError(String),
    PropagationError(String),
    /// The feed answered, but not a single element set could be parsed.
    Empty(String),
    /// No element set for the group was fetched so far.
    NoData(String),
    UnknownGroup(String),
}

impl error::Error for TleError {}

impl fmt::Display for TleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TleError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            TleError::InvalidResponse { status_code, url } => {
                write!(f, "Invalid Response ({}) {}", status_code, url)
            }
            TleError::ParseError(e) => write!(f, "TLE parse error: {}", e),
            TleError::PropagationError(e) => write!(f, "Propagation error: {}", e),
            TleError::Empty(group) => write!(f, "No valid TLE data found for {}", group),
            TleError::NoData(group) => write!(f, "No TLE data available for {}", group),
            TleError::UnknownGroup(group) => write!(f, "Unknown satellite group: {}", group),
        }
    }
}

impl From<reqwest::Error> for TleError {
    fn from(e: reqwest::Error) -> Self {
        TleError::RequestError(Arc::new(e))
    }
}
