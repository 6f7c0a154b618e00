use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// A value together with the time it was fetched.
#[derive(Debug)]
pub struct Snapshot<T> {
    pub fetched_at: DateTime<Utc>,
    pub value: Arc<T>,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            fetched_at: self.fetched_at,
            value: self.value.clone(),
        }
    }
}

/// Holds the last successfully fetched value of a feed. Collectors publish
/// into it, request handlers read from it. A failed fetch never clears the
/// previous value.
#[derive(Debug)]
pub struct Latest<T> {
    inner: Arc<RwLock<Option<Snapshot<T>>>>,
}

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
        }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, value: T) {
        self.publish_at(value, Utc::now()).await;
    }

    pub async fn publish_at(&self, value: T, fetched_at: DateTime<Utc>) {
        *self.inner.write().await = Some(Snapshot {
            fetched_at,
            value: Arc::new(value),
        });
    }

    pub async fn get(&self) -> Option<Snapshot<T>> {
        self.inner.read().await.clone()
    }

    pub async fn value(&self) -> Option<Arc<T>> {
        self.get().await.map(|snapshot| snapshot.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_replaces_value_for_all_clones() {
        let latest = Latest::new();
        let reader = latest.clone();
        assert!(reader.get().await.is_none());

        latest.publish(vec![1, 2]).await;
        latest.publish(vec![3]).await;

        let snapshot = reader.get().await.unwrap();
        assert_eq!(*snapshot.value, vec![3]);
        assert!(snapshot.fetched_at <= Utc::now());
    }
}
