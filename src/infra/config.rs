use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::get_env_default;
use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::persistence::StoreBackend, application::ref_code::RefCodeStyle,
    use_cases::waitlist::DEFAULT_REF_CODE_ATTEMPTS,
};

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Public landing page origin, used to build shareable referral links.
    pub app_origin: Url,
    pub store_backend: StoreBackend,
    /// Path of the JSON file used by the `file` backend.
    pub waitlist_file: String,
    pub edge_config: EdgeConfigSettings,
    pub redis_url: String,
    pub redis_key_prefix: String,
    pub ref_code_style: RefCodeStyle,
    pub ref_code_max_attempts: u32,
    /// Structured JSON log output. Empty disables the file layer.
    pub log_file: String,
}

/// Credentials for the `edge-config` backend. Only checked when that backend
/// is selected.
#[derive(Default)]
pub struct EdgeConfigSettings {
    pub edge_config_id: Option<String>,
    /// Vercel API token, used for item reads and the batched PATCH.
    pub api_token: Option<SecretString>,
    pub team_id: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let app_origin: Url = get_env_default("APP_ORIGIN", String::from("http://localhost:3000"))
            .parse()
            .expect("APP_ORIGIN must be a valid URL");

        let store_backend: StoreBackend = get_env_default("WAITLIST_STORE", String::from("file"))
            .parse()
            .expect("WAITLIST_STORE must be one of memory, file, edge-config, redis");
        let waitlist_file: String =
            get_env_default("WAITLIST_FILE", String::from("data/waitlist.json"));

        let edge_config = EdgeConfigSettings {
            edge_config_id: optional_env("EDGE_CONFIG_ID"),
            api_token: optional_env("VERCEL_API_TOKEN").map(|t| SecretString::new(t.into())),
            team_id: optional_env("VERCEL_TEAM_ID"),
        };

        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let redis_key_prefix: String =
            get_env_default("REDIS_KEY_PREFIX", "waitlist:".to_string());

        let ref_code_style: RefCodeStyle =
            get_env_default("REF_CODE_STYLE", String::from("alphabet"))
                .parse()
                .expect("REF_CODE_STYLE must be alphabet or hex");
        let ref_code_max_attempts: u32 =
            get_env_default("REF_CODE_MAX_ATTEMPTS", DEFAULT_REF_CODE_ATTEMPTS);

        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Self {
            bind_addr,
            cors_origin,
            app_origin,
            store_backend,
            waitlist_file,
            edge_config,
            redis_url,
            redis_key_prefix,
            ref_code_style,
            ref_code_max_attempts,
            log_file,
        }
    }
}

fn optional_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
