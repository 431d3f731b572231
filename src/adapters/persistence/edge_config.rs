//! Remote config store backed by Vercel Edge Config.
//!
//! Both reads and writes go through the management API with the API token.
//! The public read endpoint is served from a cache that trails writes, so a
//! signup could read the counter from before the previous batch.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::write_item::WriteItem,
    infra::http_client::build_client,
    use_cases::waitlist::WaitlistStore,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.vercel.com";

#[derive(Clone)]
pub struct EdgeConfigStore {
    client: Client,
    edge_config_id: String,
    api_token: SecretString,
    team_id: Option<String>,
    api_base: Url,
}

#[derive(Serialize)]
struct PatchItemsReq<'a> {
    items: &'a [WriteItem],
}

#[derive(Deserialize)]
struct ItemResp {
    #[serde(default)]
    value: Value,
}

impl EdgeConfigStore {
    pub fn new(
        edge_config_id: String,
        api_token: SecretString,
        team_id: Option<String>,
    ) -> AppResult<Self> {
        let api_base = Url::parse(DEFAULT_API_BASE_URL).map_err(|e| {
            AppError::Internal(format!("invalid base URL {DEFAULT_API_BASE_URL}: {e}"))
        })?;
        Ok(Self {
            client: build_client()?,
            edge_config_id,
            api_token,
            team_id,
            api_base,
        })
    }

    /// Points the API somewhere else (local fakes, proxies).
    pub fn with_base_url(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    fn api_url(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Edge Config API URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["v1", "edge-config", self.edge_config_id.as_str()])
            .extend(segments);
        if let Some(team_id) = &self.team_id {
            url.query_pairs_mut().append_pair("teamId", team_id);
        }
        Ok(url)
    }

    fn item_url(&self, key: &str) -> AppResult<Url> {
        self.api_url(&["item", key])
    }

    fn items_url(&self) -> AppResult<Url> {
        self.api_url(&["items"])
    }
}

#[async_trait]
impl WaitlistStore for EdgeConfigStore {
    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let resp = self
            .client
            .get(self.item_url(key)?)
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Edge Config read failed: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let resp = resp
            .error_for_status()
            .map_err(|e| AppError::Store(format!("Edge Config read failed: {e}")))?;

        let item: ItemResp = resp
            .json()
            .await
            .map_err(|e| AppError::Store(format!("Edge Config read returned bad JSON: {e}")))?;

        Ok(match item.value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn batch_write(&self, items: &[WriteItem]) -> AppResult<()> {
        let resp = self
            .client
            .patch(self.items_url()?)
            .bearer_auth(self.api_token.expose_secret())
            .json(&PatchItemsReq { items })
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Edge Config write failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Store(format!(
                "Edge Config write failed: {status} {text}"
            )));
        }

        Ok(())
    }
}
