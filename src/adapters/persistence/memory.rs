use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    app_error::AppResult, domain::entities::write_item::WriteItem,
    use_cases::waitlist::WaitlistStore,
};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryWaitlistStore {
    values: RwLock<HashMap<String, Value>>,
    writes: AtomicUsize,
}

impl InMemoryWaitlistStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches applied so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<String> = values.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl WaitlistStore for InMemoryWaitlistStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        for item in items {
            values.insert(item.key.clone(), item.value.clone());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
