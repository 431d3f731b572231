//! Store wrappers for exercising failure and concurrency paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::write_item::WriteItem,
    use_cases::waitlist::WaitlistStore,
};

/// Rejects the first `failures` batch writes, then delegates.
pub struct FailingWriteStore {
    inner: Arc<dyn WaitlistStore>,
    failures_left: AtomicU32,
}

impl FailingWriteStore {
    pub fn new(inner: Arc<dyn WaitlistStore>, failures: u32) -> Self {
        Self {
            inner,
            failures_left: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl WaitlistStore for FailingWriteStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        self.inner.get(key).await
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::Store("write rejected".into()));
        }
        self.inner.batch_write(items).await
    }
}

/// Sleeps before every operation so concurrent requests interleave between
/// their reads and their writes.
pub struct SlowStore {
    inner: Arc<dyn WaitlistStore>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: Arc<dyn WaitlistStore>) -> Self {
        Self {
            inner,
            delay: Duration::from_millis(2),
        }
    }
}

#[async_trait]
impl WaitlistStore for SlowStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(key).await
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.batch_write(items).await
    }
}

/// Reports the first `collisions` lookups of `ref_*` keys as taken.
pub struct CollidingStore {
    inner: Arc<dyn WaitlistStore>,
    collisions_left: AtomicU32,
    reported: AtomicU32,
}

impl CollidingStore {
    pub fn new(inner: Arc<dyn WaitlistStore>, collisions: u32) -> Self {
        Self {
            inner,
            collisions_left: AtomicU32::new(collisions),
            reported: AtomicU32::new(0),
        }
    }

    pub fn collisions_reported(&self) -> u32 {
        self.reported.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WaitlistStore for CollidingStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        if key.starts_with("ref_") {
            let colliding = self
                .collisions_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if colliding {
                self.reported.fetch_add(1, Ordering::SeqCst);
                return Ok(Some(json!({ "taken": true })));
            }
        }
        self.inner.get(key).await
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        self.inner.batch_write(items).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::memory::InMemoryWaitlistStore;

    #[tokio::test]
    async fn test_failing_store_recovers_after_budget() {
        let inner = Arc::new(InMemoryWaitlistStore::new());
        let store = FailingWriteStore::new(inner.clone(), 2);
        let batch = [WriteItem::upsert("counter", 1)];

        assert!(store.batch_write(&batch).await.is_err());
        assert!(store.batch_write(&batch).await.is_err());
        assert!(store.batch_write(&batch).await.is_ok());
        assert_eq!(inner.write_count(), 1);
    }

    #[tokio::test]
    async fn test_colliding_store_only_touches_ref_keys() {
        let inner = Arc::new(InMemoryWaitlistStore::new());
        let store = CollidingStore::new(inner, 1);

        assert_eq!(store.get("counter").await.unwrap(), None);
        assert!(store.get("ref_ABCD2345").await.unwrap().is_some());
        assert_eq!(store.get("ref_ABCD2345").await.unwrap(), None);
        assert_eq!(store.collisions_reported(), 1);
    }
}
