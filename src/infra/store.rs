use std::sync::Arc;

use tracing::info;

use crate::{
    adapters::persistence::{
        StoreBackend, edge_config::EdgeConfigStore, file::FileWaitlistStore,
        memory::InMemoryWaitlistStore, redis_store::RedisWaitlistStore,
    },
    infra::{config::AppConfig, error::InfraError},
    use_cases::waitlist::WaitlistStore,
};

/// Builds the store selected by `WAITLIST_STORE`.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn WaitlistStore>, InfraError> {
    let store: Arc<dyn WaitlistStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryWaitlistStore::new()),
        StoreBackend::File => Arc::new(
            FileWaitlistStore::open(&config.waitlist_file, config.ref_code_style)
                .await
                .map_err(InfraError::StoreOpen)?,
        ),
        StoreBackend::EdgeConfig => {
            let settings = &config.edge_config;
            let edge_config_id = settings
                .edge_config_id
                .clone()
                .ok_or(InfraError::ConfigMissing { var: "EDGE_CONFIG_ID" })?;
            let api_token = settings
                .api_token
                .clone()
                .ok_or(InfraError::ConfigMissing { var: "VERCEL_API_TOKEN" })?;

            Arc::new(
                EdgeConfigStore::new(edge_config_id, api_token, settings.team_id.clone())
                    .map_err(InfraError::StoreOpen)?,
            )
        }
        StoreBackend::Redis => Arc::new(
            RedisWaitlistStore::new(&config.redis_url, config.redis_key_prefix.as_str()).await?,
        ),
    };

    info!(backend = %config.store_backend, "Waitlist store ready");
    Ok(store)
}
