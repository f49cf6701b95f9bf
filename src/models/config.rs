//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::api::client::ApiClientConfig;
use crate::state::table::DEFAULT_PAGE_SIZE;

fn default_api_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_stale_time_ms() -> u64 {
    5_000
}

fn default_cache_max_entries() -> u64 {
    1_000
}

fn default_cache_idle_ms() -> u64 {
    300_000
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for the dashboard server and its backend connection.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    /// Signing key for session and flash cookies; at least 64 bytes.
    pub secret: String,
    pub templates_dir: String,
    /// Backend REST API root, e.g. `http://localhost:8080/api/v1`.
    pub api_base_url: String,
    #[serde(default = "default_api_timeout_ms")]
    pub api_timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_stale_time_ms")]
    pub stale_time_ms: u64,
    /// Most backend responses kept in memory at once.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
    #[serde(default = "default_cache_idle_ms")]
    pub cache_idle_ms: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

impl ServerConfig {
    /// Cookie domain for the session; host-only for `localhost`.
    pub fn cookie_domain(&self) -> Option<String> {
        match self.domain.as_str() {
            "" | "localhost" => None,
            domain => Some(format!(".{domain}")),
        }
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig::new(&self.api_base_url)
            .with_timeouts(self.connect_timeout_ms, self.api_timeout_ms)
    }
}
