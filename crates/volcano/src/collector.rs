use std::time::Duration;

use async_trait::async_trait;
use tracking::{
    collector::{Collector, Continuation},
    store::Latest,
};

use crate::{get_weekly_report, FeedError, WeeklyReport, GVP_RSS_URL};

/// The report is published once a week.
const REFRESH_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

const RETRY_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub struct VolcanoReportCollector {
    http: reqwest::Client,
    url: String,
    store: Latest<WeeklyReport>,
}

impl VolcanoReportCollector {
    pub fn new(store: Latest<WeeklyReport>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: GVP_RSS_URL.to_owned(),
            store,
        }
    }
}

#[async_trait]
impl Collector for VolcanoReportCollector {
    type Error = FeedError;

    fn unique_id() -> &'static str {
        "GVP Weekly Report"
    }

    async fn run(&mut self) -> Result<Continuation, Self::Error> {
        let report = get_weekly_report(&self.http, &self.url).await?;
        log::info!("weekly report mentions {} volcanoes", report.items.len());
        self.store.publish(report).await;
        Ok(Continuation::Continue)
    }

    fn tick(&self) -> Option<Duration> {
        Some(REFRESH_INTERVAL)
    }

    fn backoff(&self, _last_backoff: Duration) -> Duration {
        RETRY_INTERVAL
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use chrono::{TimeZone, Utc};

    use super::*;

    #[tokio::test]
    async fn failed_download_keeps_previous_report() {
        let store = Latest::new();
        let fetched_at = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        store
            .publish_at(WeeklyReport { items: Vec::new() }, fetched_at)
            .await;

        // nothing listens on this port once the listener is dropped
        let address = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let mut collector = VolcanoReportCollector {
            url: format!("http://{}/WeeklyVolcanoRSS.xml", address),
            ..VolcanoReportCollector::new(store.clone())
        };
        assert!(matches!(
            collector.run().await,
            Err(FeedError::RequestError(_))
        ));
        assert_eq!(collector.backoff(RETRY_INTERVAL * 4), RETRY_INTERVAL);

        let snapshot = store.get().await.unwrap();
        assert_eq!(snapshot.fetched_at, fetched_at);
    }
}
