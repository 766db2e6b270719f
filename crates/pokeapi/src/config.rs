//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Public PokeAPI v2 root.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Page size the listing endpoint is asked for on the first page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings for [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Applies to every request, including each detail fetch of a page.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_api() {
        let c = ClientConfig::default();
        assert_eq!(c.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(c.page_size, 20);
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: ClientConfig = serde_json::from_str(r#"{"pageSize":50}"#).unwrap();
        assert_eq!(c.page_size, 50);
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&ClientConfig::default()).unwrap();
        assert!(json.contains("baseUrl"));
        assert!(json.contains("requestTimeoutSecs"));
    }
}
