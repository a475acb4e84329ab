use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use shared_models::UniqueId;

/// Keyed async mutexes serializing read-check-write sequences.
///
/// Callers that need both must take the provider lock before the
/// appointment lock.
#[derive(Debug, Default)]
pub struct SchedulingLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SchedulingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_provider(&self, provider_id: &UniqueId) -> OwnedMutexGuard<()> {
        self.acquire(format!("provider:{}", provider_id)).await
    }

    pub async fn lock_appointment(&self, appointment_id: &UniqueId) -> OwnedMutexGuard<()> {
        self.acquire(format!("appointment:{}", appointment_id)).await
    }

    /// Number of keys currently tracked.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.locks.lock().await.is_empty()
    }

    async fn acquire(&self, key: String) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().await;
            // Entries nobody holds or waits on can go.
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            locks.entry(key).or_default().clone()
        };

        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_key_is_exclusive() {
        let locks = Arc::new(SchedulingLocks::new());
        let id = UniqueId::new("provider-1");

        let guard = locks.lock_provider(&id).await;

        let contender = {
            let locks = locks.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.lock_provider(&id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender should acquire after release")
            .unwrap();
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block() {
        let locks = SchedulingLocks::new();

        let _provider = locks.lock_provider(&UniqueId::new("shared-id")).await;
        let _appointment = locks.lock_appointment(&UniqueId::new("shared-id")).await;

        assert_eq!(locks.len().await, 2);
    }

    #[tokio::test]
    async fn released_keys_are_pruned() {
        let locks = SchedulingLocks::new();

        drop(locks.lock_provider(&UniqueId::new("provider-1")).await);
        let _held = locks.lock_provider(&UniqueId::new("provider-2")).await;

        assert_eq!(locks.len().await, 1);
    }
}
