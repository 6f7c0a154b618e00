use std::{error, fmt, sync::Arc};

use tokio_tungstenite::tungstenite;

pub mod collector;
pub mod config;
pub mod envelope;
pub mod feed;

pub use config::AisStreamConfig;
pub use feed::{ConnectionState, ShipFeed};

#[derive(Debug, Clone)]
pub enum StreamError {
    WebSocketError(Arc<tungstenite::Error>),
    JsonError(Arc<serde_json::Error>),
    /// The server ended the subscription.
    Closed,
    /// The vessel cache is gone, nothing can be stored anymore.
    CacheUnavailable(String),
}

impl error::Error for StreamError {}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StreamError::WebSocketError(e) => write!(f, "WebSocket error: {}", e),
            StreamError::JsonError(e) => write!(f, "JSON error: {}", e),
            StreamError::Closed => write!(f, "Subscription closed by server."),
            StreamError::CacheUnavailable(e) => write!(f, "{}", e),
        }
    }
}

impl From<tungstenite::Error> for StreamError {
    fn from(e: tungstenite::Error) -> Self {
        StreamError::WebSocketError(Arc::new(e))
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(e: serde_json::Error) -> Self {
        StreamError::JsonError(Arc::new(e))
    }
}

impl From<tracking::TrackingError> for StreamError {
    fn from(e: tracking::TrackingError) -> Self {
        StreamError::CacheUnavailable(e.to_string())
    }
}
