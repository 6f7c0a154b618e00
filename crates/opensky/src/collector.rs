use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::DateTime;
use model::flight::Aircraft;
use tracking::{
    collector::{Collector, Continuation},
    store::Latest,
};

use crate::{client::OpenSkyClient, ApiError};

/// Anonymous clients get a new state every ten seconds at best and a limited
/// daily quota.
const POLL_INTERVAL: Duration = Duration::from_secs(30);

pub struct FlightCollector {
    client: Arc<OpenSkyClient>,
    store: Latest<Vec<Aircraft>>,
}

impl FlightCollector {
    pub fn new(client: Arc<OpenSkyClient>, store: Latest<Vec<Aircraft>>) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl Collector for FlightCollector {
    type Error = ApiError;

    fn unique_id() -> &'static str {
        "OpenSky"
    }

    async fn run(&mut self) -> Result<Continuation, Self::Error> {
        let response = self.client.get_states().await?;
        let aircraft = response.aircraft();
        log::debug!("received {} aircraft", aircraft.len());
        match DateTime::from_timestamp(response.time, 0) {
            Some(fetched_at) => self.store.publish_at(aircraft, fetched_at).await,
            None => self.store.publish(aircraft).await,
        }
        Ok(Continuation::Continue)
    }

    fn tick(&self) -> Option<Duration> {
        Some(POLL_INTERVAL)
    }

    /// Failed polls are retried on the regular interval.
    fn backoff(&self, _last_backoff: Duration) -> Duration {
        POLL_INTERVAL
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use chrono::{TimeZone, Utc};
    use model::ExampleData;

    use super::*;

    /// An address nothing listens on.
    fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    }

    fn collector(store: Latest<Vec<Aircraft>>) -> FlightCollector {
        let client = OpenSkyClient::new(None).with_base_url(closed_port());
        FlightCollector::new(Arc::new(client), store)
    }

    #[test]
    fn backoff_does_not_grow() {
        let collector = collector(Latest::new());
        let mut backoff = collector.tick().unwrap();
        for _ in 0..100 {
            backoff = collector.backoff(backoff);
            assert_eq!(backoff, POLL_INTERVAL);
        }
    }

    #[tokio::test]
    async fn failed_poll_keeps_previous_aircraft() {
        let store = Latest::new();
        let fetched_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        store
            .publish_at(vec![Aircraft::example_data()], fetched_at)
            .await;

        let mut collector = collector(store.clone());
        assert!(matches!(
            collector.run().await,
            Err(ApiError::RequestError(_))
        ));

        let snapshot = store.get().await.unwrap();
        assert_eq!(snapshot.fetched_at, fetched_at);
        assert_eq!(snapshot.value.len(), 1);
    }
}
