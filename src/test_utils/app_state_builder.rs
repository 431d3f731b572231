//! Builds a minimal `AppState` around a given store for HTTP-level tests.

use std::sync::Arc;

use axum::http::HeaderValue;
use url::Url;

use crate::{
    adapters::{http::app_state::AppState, persistence::StoreBackend},
    application::ref_code::RefCodeStyle,
    infra::config::{AppConfig, EdgeConfigSettings},
    use_cases::waitlist::{DEFAULT_REF_CODE_ATTEMPTS, WaitlistStore, WaitlistUseCases},
};

pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        app_origin: Url::parse("http://localhost:3000").unwrap(),
        store_backend: StoreBackend::Memory,
        waitlist_file: String::new(),
        edge_config: EdgeConfigSettings::default(),
        redis_url: String::new(),
        redis_key_prefix: String::new(),
        ref_code_style: RefCodeStyle::Alphabet,
        ref_code_max_attempts: DEFAULT_REF_CODE_ATTEMPTS,
        log_file: String::new(),
    }
}

pub fn test_app_state(store: Arc<dyn WaitlistStore>) -> AppState {
    let config = test_config();
    let waitlist_use_cases =
        WaitlistUseCases::new(store, config.ref_code_style, config.ref_code_max_attempts);

    AppState {
        config: Arc::new(config),
        waitlist_use_cases: Arc::new(waitlist_use_cases),
    }
}
