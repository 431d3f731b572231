use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use serde_json::Value;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::write_item::{WriteItem, WriteOperation},
    infra::error::InfraError,
    use_cases::waitlist::WaitlistStore,
};

/// Redis-backed store. Values are kept as JSON text; batches run as a
/// `MULTI`/`EXEC` pipeline.
#[derive(Clone)]
pub struct RedisWaitlistStore {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisWaitlistStore {
    pub async fn new(redis_url: &str, key_prefix: impl Into<String>) -> Result<Self, InfraError> {
        let client = redis::Client::open(redis_url).map_err(InfraError::RedisConnection)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(InfraError::RedisConnection)?;
        Ok(Self {
            manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn key(&self, key: &str) -> String {
        prefixed(&self.key_prefix, key)
    }
}

#[async_trait]
impl WaitlistStore for RedisWaitlistStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn
            .get(self.key(key))
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        raw.map(|text| serde_json::from_str(&text).map_err(AppError::from))
            .transpose()
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let mut pipe = redis::pipe();
        pipe.atomic();
        for item in items {
            match item.operation {
                WriteOperation::Upsert => {
                    let text = serde_json::to_string(&item.value)
                        .map_err(|e| AppError::Internal(e.to_string()))?;
                    pipe.set(self.key(&item.key), text).ignore();
                }
            }
        }

        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        Ok(())
    }
}

fn prefixed(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}
