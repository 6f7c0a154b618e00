use crate::collector::{self, Collector, CollectorRef, CollectorStatus};

/// Owns the running collectors of the process.
#[derive(Default)]
pub struct Server {
    collectors: Vec<CollectorRef>,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collector<C, F>(&mut self, factory: F)
    where
        C: Collector,
        F: 'static + Send + Fn() -> C,
    {
        self.collectors.push(collector::run(factory));
    }

    pub fn statuses(&self) -> Vec<CollectorStatus> {
        self.collectors.iter().map(CollectorRef::status).collect()
    }

    pub fn shutdown(&self) {
        for collector in &self.collectors {
            collector.abort();
        }
    }
}
