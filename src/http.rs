//! HTTP client utilities
//!
//! Provides a reqwest::Client configured with a timeout and the crate user agent.
//! Proxy settings come from reqwest's own HTTP_PROXY / HTTPS_PROXY / NO_PROXY handling.

use crate::error::AppError;
use reqwest::Client;
use std::time::Duration;

/// Build a reqwest Client with the given per-request timeout
pub fn client_with_timeout(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("bsky-search/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}
