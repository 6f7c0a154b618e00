use std::any::Any;
use std::fmt::{Debug, Display};
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use actors::actor::SupervisionStrategy;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use schemars::JsonSchema;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, sleep, MissedTickBehavior};

/// Waiting time used when a collector does not define a tick.
pub const DEFAULT_TICK: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub enum Continuation {
    ContinueAfter(Duration),
    ContinueAt(DateTime<Utc>),
    /// Run again on the next tick, or immediately if there is no tick.
    Continue,
    /// Replace the collector with a fresh instance from its factory.
    Restart,
    Exit,
}

#[async_trait]
pub trait Collector: Send + 'static {
    type Error: Debug + Display + Send;

    /// This string should uniquely identify the collector implementation. It
    /// must never change.
    fn unique_id() -> &'static str;

    /// Names this instance in status reports and log output. Collectors that
    /// run once per feed should include the feed.
    fn name(&self) -> String {
        Self::unique_id().to_owned()
    }

    /// This method is regularly called and supposed to gather data and
    /// publish it.
    async fn run(&mut self) -> Result<Continuation, Self::Error>;

    /// Specifies how long to wait between calls to the `run` method.
    fn tick(&self) -> Option<Duration> {
        Some(DEFAULT_TICK)
    }

    /// Defines a backoff function, used to progressively increase the waiting
    /// time when consecutive failures happen.
    fn backoff(&self, last_backoff: Duration) -> Duration {
        last_backoff + self.tick().unwrap_or(DEFAULT_TICK)
    }

    /// Specifies the behavior if the collector returns an error.
    fn on_error(&self, _error: Self::Error) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }

    /// Specifies the behavior if the collector panics.
    fn on_panic(&self, _error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Restart
    }
}

/// Health of one collector as reported by `/api/status`.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectorStatus {
    pub name: String,
    pub running: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl CollectorStatus {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            running: true,
            last_success: None,
            last_failure: None,
            last_error: None,
            consecutive_failures: 0,
        }
    }

    fn succeeded(&mut self) {
        self.last_success = Some(Utc::now());
        self.consecutive_failures = 0;
    }

    fn failed(&mut self, why: String) {
        self.last_failure = Some(Utc::now());
        self.last_error = Some(why);
        self.consecutive_failures += 1;
    }
}

pub struct CollectorRef {
    status: watch::Receiver<CollectorStatus>,
    handle: JoinHandle<()>,
}

impl CollectorRef {
    pub fn status(&self) -> CollectorStatus {
        let mut status = self.status.borrow().clone();
        status.running &= !self.handle.is_finished();
        status
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectorStatus> {
        self.status.clone()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }
}

async fn wait_until(at: DateTime<Utc>) {
    // times in the past resolve immediately
    sleep((at - Utc::now()).to_std().unwrap_or_default()).await;
}

/// Spawns a collector and keeps it running according to the continuation it
/// returns. Errors and panics are handled by the strategies the collector
/// defines, waiting for the backoff time in between attempts.
pub fn run<C, F>(factory: F) -> CollectorRef
where
    C: Collector,
    F: 'static + Send + Fn() -> C,
{
    let mut collector = factory();
    let name = collector.name();
    let (status_tx, status_rx) = watch::channel(CollectorStatus::new(&name));

    // run collector
    let handle = tokio::spawn(async move {
        let mut interval = collector.tick().map(|tick| {
            let mut interval = time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        // the first tick completes immediately
        if let Some(interval) = &mut interval {
            interval.tick().await;
        }
        let mut backoff = collector.tick().unwrap_or(DEFAULT_TICK);
        log::info!("collector {} started", name);
        loop {
            // run
            let result = AssertUnwindSafe(collector.run()).catch_unwind().await;
            // check for errors
            let result = match result {
                Ok(Ok(continuation)) => {
                    status_tx.send_modify(CollectorStatus::succeeded);
                    Ok(continuation)
                }
                Ok(Err(why)) => {
                    log::warn!("collector {} failed: {}", name, why);
                    status_tx.send_modify(|status| status.failed(why.to_string()));
                    Err(collector.on_error(why))
                }
                Err(why) => {
                    log::error!("collector {} paniced: {:?}", name, why);
                    status_tx.send_modify(|status| status.failed("panicked".to_owned()));
                    Err(collector.on_panic(why))
                }
            };
            // continue
            match result {
                Ok(continuation) => {
                    match continuation {
                        Continuation::ContinueAfter(duration) => sleep(duration).await,
                        Continuation::ContinueAt(at) => wait_until(at).await,
                        Continuation::Continue => {
                            if let Some(tick) = &mut interval {
                                tick.tick().await;
                            }
                        }
                        Continuation::Restart => {
                            collector = factory();
                            if let Some(tick) = &mut interval {
                                tick.tick().await;
                            }
                        }
                        Continuation::Exit => break,
                    }
                    backoff = collector.tick().unwrap_or(DEFAULT_TICK);
                }
                Err(strategy) => {
                    match strategy {
                        SupervisionStrategy::Restart => collector = factory(),
                        SupervisionStrategy::Resume => {}
                        SupervisionStrategy::Stop => break,
                    }
                    backoff = collector.backoff(backoff);
                    log::debug!("collector {} retrying in {:?}", name, backoff);
                    sleep(backoff).await;
                }
            }
        }
        log::info!("collector {} stopped", name);
        status_tx.send_modify(|status| status.running = false);
    });

    CollectorRef {
        status: status_rx,
        handle,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    /// Fails `failures` times, then succeeds and exits.
    struct Flaky {
        calls: Arc<AtomicUsize>,
        failures: usize,
        strategy: SupervisionStrategy,
    }

    #[async_trait]
    impl Collector for Flaky {
        type Error = String;

        fn unique_id() -> &'static str {
            "flaky"
        }

        async fn run(&mut self) -> Result<Continuation, Self::Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(format!("attempt {} failed", call))
            } else {
                Ok(Continuation::Exit)
            }
        }

        fn tick(&self) -> Option<Duration> {
            None
        }

        fn backoff(&self, _: Duration) -> Duration {
            Duration::from_millis(1)
        }

        fn on_error(&self, _: Self::Error) -> SupervisionStrategy {
            self.strategy
        }
    }

    async fn finished(collector: &CollectorRef) -> CollectorStatus {
        let mut status = collector.subscribe();
        status
            .wait_for(|status| !status.running)
            .await
            .map(|status| status.clone())
            .unwrap_or_else(|_| collector.status())
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = calls.clone();
        let collector = run(move || Flaky {
            calls: shared.clone(),
            failures: 3,
            strategy: SupervisionStrategy::Resume,
        });

        let status = finished(&collector).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(status.consecutive_failures, 0);
        assert!(status.last_success.is_some());
        assert_eq!(status.last_error.as_deref(), Some("attempt 2 failed"));
    }

    #[tokio::test]
    async fn stop_strategy_ends_the_collector() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared = calls.clone();
        let collector = run(move || Flaky {
            calls: shared.clone(),
            failures: 10,
            strategy: SupervisionStrategy::Stop,
        });

        let status = finished(&collector).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(status.consecutive_failures, 1);
        assert!(status.last_success.is_none());
    }
}
