//! HTTP client configuration and construction
//!
//! One `reqwest::Client` is shared by every component; per-request headers
//! differ (the API identity for reddit requests, a browser-like identity for
//! page fetches), so no default User-Agent is baked in here.

use std::time::Duration;

use reqwest::Client;

use crate::constants::http;
use crate::errors::{AuthError, AuthResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> AuthResult<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(AuthError::Http)
    }
}
