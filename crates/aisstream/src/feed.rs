use std::sync::Arc;

use actors::actor_ref::ActorRef;
use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::watch;
use tracking::{
    server::Server,
    vessels::{self, VesselCache},
};

use crate::{collector::AisStreamCollector, AisStreamConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    /// No API key configured.
    Disabled,
    Disconnected,
    Connecting,
    Subscribed,
}

/// The vessel cache together with the subscription feeding it.
#[derive(Clone)]
pub struct ShipFeed {
    pub cache: ActorRef<VesselCache>,
    state: watch::Receiver<ConnectionState>,
}

impl ShipFeed {
    /// Spawns the vessel cache and, if configured, the subscription loop.
    pub fn start(config: Option<AisStreamConfig>, server: &mut Server) -> Self {
        let cache = vessels::spawn();
        let Some(config) = config else {
            log::warn!("AISSTREAM_API_KEY not set, ship tracking disabled");
            let (_, state) = watch::channel(ConnectionState::Disabled);
            return Self { cache, state };
        };

        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let (config, state_tx) = (Arc::new(config), Arc::new(state_tx));
        let collector_cache = cache.clone();
        server.collector(move || {
            AisStreamCollector::new(config.clone(), collector_cache.clone(), state_tx.clone())
        });
        Self { cache, state }
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }
}
