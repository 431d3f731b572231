//! HTTP client factory with consistent timeout configuration.
//!
//! Outbound clients (the remote config store) must be built here rather than
//! with `reqwest::Client::new()`, which has no request timeout.

use reqwest::Client;
use std::time::Duration;

use crate::app_error::{AppError, AppResult};

/// Default connect timeout (TCP handshake + TLS).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default request timeout (total request/response time).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn build_client() -> AppResult<Client> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(DEFAULT_REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))
}
