use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::UniqueId;

/// Async in-memory table keyed by [`UniqueId`].
///
/// Rows are stored by value and handed out as clones, so callers never hold a
/// reference into the table. An optional per-call latency mimics a remote
/// store.
#[derive(Debug)]
pub struct MemoryTable<T> {
    name: &'static str,
    rows: RwLock<HashMap<UniqueId, T>>,
    latency: Duration,
}

impl<T: Clone + Send + Sync> MemoryTable<T> {
    pub fn new(name: &'static str) -> Self {
        Self::with_latency(name, Duration::ZERO)
    }

    pub fn with_latency(name: &'static str, latency: Duration) -> Self {
        Self {
            name,
            rows: RwLock::new(HashMap::new()),
            latency,
        }
    }

    pub fn from_config(name: &'static str, config: &AppConfig) -> Self {
        Self::with_latency(name, config.simulated_latency())
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn get(&self, id: &UniqueId) -> Option<T> {
        self.delay().await;
        self.rows.read().await.get(id).cloned()
    }

    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.delay().await;
        self.rows.read().await.values().find(|row| predicate(row)).cloned()
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.delay().await;
        self.rows
            .read()
            .await
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub async fn upsert(&self, id: UniqueId, row: T) {
        self.delay().await;
        let replaced = self.rows.write().await.insert(id.clone(), row).is_some();
        debug!("{}: {} row {}", self.name, if replaced { "updated" } else { "inserted" }, id);
    }

    pub async fn remove(&self, id: &UniqueId) -> bool {
        self.delay().await;
        self.rows.write().await.remove(id).is_some()
    }

    pub async fn contains(&self, id: &UniqueId) -> bool {
        self.delay().await;
        self.rows.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}
