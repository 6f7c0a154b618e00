use std::{sync::Arc, time::Duration};

use actors::actor_ref::ActorRef;
use async_trait::async_trait;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracking::{
    collector::{Collector, Continuation},
    vessels::{VesselCache, VesselCacheRef},
};

use crate::{envelope::decode, AisStreamConfig, ConnectionState, StreamError};

/// Fixed delay before reconnecting; retried for the lifetime of the process.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(10);

/// Holds one subscription open per run and feeds every decoded message into
/// the vessel cache. A run only ends when the connection does.
pub struct AisStreamCollector {
    config: Arc<AisStreamConfig>,
    cache: ActorRef<VesselCache>,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl AisStreamCollector {
    pub fn new(
        config: Arc<AisStreamConfig>,
        cache: ActorRef<VesselCache>,
        state: Arc<watch::Sender<ConnectionState>>,
    ) -> Self {
        Self {
            config,
            cache,
            state,
        }
    }

    async fn stream(&self) -> Result<(), StreamError> {
        self.state.send_replace(ConnectionState::Connecting);
        log::info!("Connecting to {}", self.config.url);
        let (socket, _) = tokio_tungstenite::connect_async(self.config.url.as_str()).await?;
        let (mut write, mut read) = socket.split();

        let subscription = serde_json::to_string(&self.config.subscription())?;
        write.send(Message::Text(subscription)).await?;
        self.state.send_replace(ConnectionState::Subscribed);
        log::info!("Subscribed to {}", self.config.url);

        while let Some(message) = read.next().await {
            match message? {
                Message::Text(text) => ingest(&self.cache, text.as_bytes()).await?,
                Message::Binary(data) => ingest(&self.cache, &data).await?,
                Message::Ping(data) => write.send(Message::Pong(data)).await?,
                Message::Close(frame) => {
                    log::info!("close frame received: {:?}", frame);
                    break;
                }
                _ => {}
            }
        }
        Err(StreamError::Closed)
    }
}

/// Decodes a message and applies it to the cache. Messages that cannot be
/// decoded are counted and skipped.
pub async fn ingest(cache: &ActorRef<VesselCache>, payload: &[u8]) -> Result<(), StreamError> {
    match decode(payload, Utc::now()) {
        Ok(update) => cache.apply(update).await?,
        Err(why) => {
            log::debug!("dropping message: {}", why);
            cache.record_dropped().await?;
        }
    }
    Ok(())
}

#[async_trait]
impl Collector for AisStreamCollector {
    type Error = StreamError;

    fn unique_id() -> &'static str {
        "AisStream"
    }

    async fn run(&mut self) -> Result<Continuation, Self::Error> {
        let result = self.stream().await;
        self.state.send_replace(ConnectionState::Disconnected);
        result.map(|_| Continuation::Continue)
    }

    fn tick(&self) -> Option<Duration> {
        None
    }

    fn backoff(&self, _last_backoff: Duration) -> Duration {
        RECONNECT_DELAY
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use tokio::{net::TcpListener, time::Instant};
    use tracking::vessels;

    use super::*;

    fn position_report(mmsi: u32) -> String {
        json!({
            "MessageType": "PositionReport",
            "MetaData": { "MMSI": mmsi },
            "Message": { "PositionReport": {
                "UserID": mmsi, "Latitude": 54.5, "Longitude": 10.2,
                "Sog": 9.1, "Cog": 181.0, "TrueHeading": 180
            } }
        })
        .to_string()
    }

    fn static_data(mmsi: u32) -> String {
        json!({
            "MessageType": "ShipStaticData",
            "MetaData": { "MMSI": mmsi },
            "Message": { "ShipStaticData": {
                "UserID": mmsi, "Name": "KIELER FOERDE@@@", "Type": 60, "Destination": "KIEL"
            } }
        })
        .to_string()
    }

    #[tokio::test]
    async fn position_and_static_data_merge_into_one_record() {
        let cache = vessels::spawn();
        ingest(&cache, position_report(211_000_001).as_bytes()).await.unwrap();
        ingest(&cache, static_data(211_000_001).as_bytes()).await.unwrap();
        ingest(&cache, b"not json").await.unwrap();

        let snapshot = cache.snapshot(Utc::now()).await;
        assert_eq!(snapshot.len(), 1);
        let vessel = &snapshot[0].content;
        assert_eq!(vessel.position.map(|p| p.lat), Some(54.5));
        assert_eq!(vessel.kinematics.heading, Some(180.0));
        assert_eq!(vessel.metadata.name.as_deref(), Some("KIELER FOERDE"));
        assert_eq!(vessel.metadata.destination.as_deref(), Some("KIEL"));
        assert_eq!(cache.stats().await.unwrap().dropped, 1);
    }

    #[tokio::test]
    async fn subscribes_and_streams_until_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
            let subscription = match socket.next().await {
                Some(Ok(Message::Text(text))) => text,
                other => panic!("expected subscription, got {:?}", other),
            };
            socket
                .send(Message::Binary(position_report(7).into_bytes()))
                .await
                .unwrap();
            socket.send(Message::Text(static_data(7))).await.unwrap();
            socket.close(None).await.unwrap();
            subscription
        });

        let mut config = AisStreamConfig::new("test-key");
        config.url = format!("ws://{}", address);
        let cache = vessels::spawn();
        let (state_tx, state) = watch::channel(ConnectionState::Disconnected);
        let mut collector =
            AisStreamCollector::new(Arc::new(config), cache.clone(), Arc::new(state_tx));

        assert!(matches!(collector.run().await, Err(StreamError::Closed)));
        assert_eq!(*state.borrow(), ConnectionState::Disconnected);

        let subscription: serde_json::Value =
            serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(subscription["APIKey"], "test-key");

        let snapshot = cache.snapshot(Utc::now() + Duration::seconds(1)).await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id.into_raw(), 7);
        assert_eq!(snapshot[0].content.metadata.ship_type, Some(60));
    }

    #[tokio::test(start_paused = true)]
    async fn reconnects_after_a_fixed_delay() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = AisStreamConfig::new("test-key");
        config.url = format!("ws://{}", listener.local_addr().unwrap());
        let config = Arc::new(config);
        let cache = vessels::spawn();
        let state = Arc::new(watch::channel(ConnectionState::Disconnected).0);
        let collector = tracking::collector::run(move || {
            AisStreamCollector::new(config.clone(), cache.clone(), state.clone())
        });

        let mut connected_at = Vec::new();
        for _ in 0..3 {
            let (stream, _) = listener.accept().await.unwrap();
            connected_at.push(Instant::now());
            let mut socket = tokio_tungstenite::accept_async(stream).await.unwrap();
            assert!(matches!(socket.next().await, Some(Ok(Message::Text(_)))));
            socket.close(None).await.unwrap();
        }
        let status = collector.status();
        collector.abort();

        assert!(status.consecutive_failures >= 2);
        for connections in connected_at.windows(2) {
            let delay = connections[1] - connections[0];
            assert!(
                delay >= RECONNECT_DELAY && delay < RECONNECT_DELAY * 2,
                "reconnected after {:?}",
                delay
            );
        }
    }
}
