use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracking::{
    collector::{Collector, Continuation},
    store::Latest,
};

use crate::{
    client::CelestrakClient,
    tle::{parse_tle, Satellite},
    TleError,
};

/// CelesTrak asks clients not to poll a group more often than every two hours.
const REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

const RETRY_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Keeps the element sets of one group current.
pub struct TleCollector {
    group: String,
    client: Arc<CelestrakClient>,
    store: Latest<Vec<Satellite>>,
}

impl TleCollector {
    pub fn new(
        group: String,
        client: Arc<CelestrakClient>,
        store: Latest<Vec<Satellite>>,
    ) -> Self {
        Self {
            group,
            client,
            store,
        }
    }
}

#[async_trait]
impl Collector for TleCollector {
    type Error = TleError;

    fn unique_id() -> &'static str {
        "CelesTrak TLE"
    }

    fn name(&self) -> String {
        format!("celestrak/{}", self.group)
    }

    async fn run(&mut self) -> Result<Continuation, Self::Error> {
        let text = self.client.get_group(&self.group).await?;
        let satellites = parse_tle(&text);
        if satellites.is_empty() {
            // keep the previous set
            return Err(TleError::Empty(self.group.clone()));
        }
        log::info!("fetched {} element sets for {}", satellites.len(), self.group);
        self.store.publish(satellites).await;
        Ok(Continuation::Continue)
    }

    fn tick(&self) -> Option<Duration> {
        Some(REFRESH_INTERVAL)
    }

    /// Retries a failed fetch after five minutes instead of a full interval.
    fn backoff(&self, _last_backoff: Duration) -> Duration {
        RETRY_INTERVAL
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;
    use crate::tle::ISS_FALLBACK_TLE;

    const EMPTY_RESPONSE: &[u8] =
        b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    /// Serves an empty `200 OK` to every request.
    async fn empty_feed() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut request = [0; 1024];
                let _ = stream.read(&mut request).await;
                let _ = stream.write_all(EMPTY_RESPONSE).await;
            }
        });
        format!("http://{}", address)
    }

    #[tokio::test]
    async fn empty_group_keeps_previous_set() {
        let store = Latest::new();
        store.publish(parse_tle(&ISS_FALLBACK_TLE.join("\n"))).await;
        let published = store.get().await.unwrap().fetched_at;

        let client = CelestrakClient::new(empty_feed().await);
        let mut collector =
            TleCollector::new("stations".to_owned(), Arc::new(client), store.clone());
        assert!(matches!(
            collector.run().await,
            Err(TleError::Empty(group)) if group == "stations"
        ));
        assert_eq!(collector.backoff(REFRESH_INTERVAL), RETRY_INTERVAL);

        let snapshot = store.get().await.unwrap();
        assert_eq!(snapshot.fetched_at, published);
        assert_eq!(snapshot.value.len(), 1);
        assert_eq!(snapshot.value[0].name, "ISS (ZARYA)");
    }
}
