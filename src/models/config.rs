//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::query::DEFAULT_PAGE_SIZE;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Key for the session and flash message cookies, at least 64 bytes.
    pub secret: String,
    /// Base URL of the leads backend.
    pub api_url: String,
    /// Where visitors without a valid backend session are sent.
    pub login_url: String,
    /// Name of the backend session cookie forwarded on every API call.
    pub session_cookie: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}
