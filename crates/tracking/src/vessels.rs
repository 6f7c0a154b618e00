use std::{any::Any, collections::HashMap};

use actors::{
    actor::{Actor, SupervisionStrategy},
    actor_ref::ActorRef,
    handler::{Handler, Message},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use model::{
    vessel::{Vessel, VesselUpdate},
    WithId,
};
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::Id;

use crate::TrackingResult;

/// Hard limit on cached vessels. Exceeding it triggers an eviction sweep.
pub const CAPACITY: usize = 2000;

/// Number of most recently updated vessels kept by an eviction sweep.
pub const RETAINED_AFTER_SWEEP: usize = 1000;

/// Vessels not heard of for longer than this are left out of snapshots.
pub const FRESHNESS_WINDOW_SECS: i64 = 600;

/// Pending updates the cache accepts before the feed has to wait.
const MAILBOX_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub vessels: usize,
    pub applied: u64,
    /// Updates older than the data already cached for the same vessel.
    pub outdated: u64,
    /// Feed messages that could not be decoded.
    pub dropped: u64,
    pub evicted: u64,
}

/// Best-known state of every vessel reported by the AIS feed.
#[derive(Debug, Default)]
pub struct VesselCache {
    vessels: HashMap<Id<Vessel>, Vessel>,
    stats: CacheStats,
}

impl VesselCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }

    /// Merges an update into the record of its vessel, creating it on first
    /// sight, and sweeps the cache if it grew beyond its capacity.
    pub fn apply(&mut self, update: &VesselUpdate) -> bool {
        let applied = match self.vessels.get_mut(&update.mmsi) {
            Some(vessel) => vessel.apply(update),
            None => {
                self.vessels.insert(update.mmsi, Vessel::from_update(update));
                true
            }
        };
        if applied {
            self.stats.applied += 1;
        } else {
            self.stats.outdated += 1;
        }
        if self.vessels.len() > CAPACITY {
            self.sweep();
        }
        applied
    }

    /// Keeps only the `RETAINED_AFTER_SWEEP` most recently updated vessels.
    fn sweep(&mut self) {
        let before = self.vessels.len();
        let mut vessels = self.vessels.drain().collect::<Vec<_>>();
        vessels.sort_unstable_by(|(_, a), (_, b)| b.last_updated.cmp(&a.last_updated));
        vessels.truncate(RETAINED_AFTER_SWEEP);
        self.vessels = vessels.into_iter().collect();
        self.stats.evicted += (before - self.vessels.len()) as u64;
        log::debug!("evicted {} vessels", before - self.vessels.len());
    }

    /// Every vessel updated within the freshness window before `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Vec<WithId<Vessel>> {
        let window = Duration::seconds(FRESHNESS_WINDOW_SECS);
        self.vessels
            .iter()
            .filter(|(_, vessel)| now - vessel.last_updated <= window)
            .map(|(id, vessel)| WithId::new(*id, vessel.clone()))
            .collect()
    }

    pub fn record_dropped(&mut self) {
        self.stats.dropped += 1;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            vessels: self.vessels.len(),
            ..self.stats
        }
    }
}

impl Actor for VesselCache {
    // a panicking update must not lose the other vessels
    fn on_fail(&mut self, _error: Box<dyn Any + Send>) -> SupervisionStrategy {
        SupervisionStrategy::Resume
    }
}

pub struct Apply(pub VesselUpdate);

impl Message for Apply {
    type Response = bool;
}

#[async_trait]
impl Handler<Apply> for VesselCache {
    async fn handle(&mut self, message: Apply) -> bool {
        self.apply(&message.0)
    }
}

pub struct Snapshot {
    pub now: DateTime<Utc>,
}

impl Message for Snapshot {
    type Response = Vec<WithId<Vessel>>;
}

#[async_trait]
impl Handler<Snapshot> for VesselCache {
    async fn handle(&mut self, message: Snapshot) -> Vec<WithId<Vessel>> {
        self.snapshot(message.now)
    }
}

pub struct RecordDropped;

impl Message for RecordDropped {
    type Response = ();
}

#[async_trait]
impl Handler<RecordDropped> for VesselCache {
    async fn handle(&mut self, _: RecordDropped) {
        self.record_dropped();
    }
}

pub struct Stats;

impl Message for Stats {
    type Response = CacheStats;
}

#[async_trait]
impl Handler<Stats> for VesselCache {
    async fn handle(&mut self, _: Stats) -> CacheStats {
        self.stats()
    }
}

/// Starts the cache actor. All writes and reads go through its mailbox, so
/// a snapshot never observes a half-applied update.
pub fn spawn() -> ActorRef<VesselCache> {
    actors::run_with_capacity(MAILBOX_CAPACITY, VesselCache::new)
}

#[async_trait]
pub trait VesselCacheRef {
    async fn apply(&self, update: VesselUpdate) -> TrackingResult<()>;

    /// Fresh vessels at `now`. An unavailable cache reads as empty.
    async fn snapshot(&self, now: DateTime<Utc>) -> Vec<WithId<Vessel>>;

    async fn record_dropped(&self) -> TrackingResult<()>;

    async fn stats(&self) -> TrackingResult<CacheStats>;
}

#[async_trait]
impl VesselCacheRef for ActorRef<VesselCache> {
    async fn apply(&self, update: VesselUpdate) -> TrackingResult<()> {
        Ok(self.tell(Apply(update)).await?)
    }

    async fn snapshot(&self, now: DateTime<Utc>) -> Vec<WithId<Vessel>> {
        self.ask(Snapshot { now }).await.unwrap_or_else(|why| {
            log::warn!("vessel snapshot failed: {}", why);
            vec![]
        })
    }

    async fn record_dropped(&self) -> TrackingResult<()> {
        Ok(self.tell(RecordDropped).await?)
    }

    async fn stats(&self) -> TrackingResult<CacheStats> {
        Ok(self.ask(Stats).await?)
    }
}
