use serde::{Deserialize, Serialize};

/// Path prefix under which a reverse proxy exposes the backend.
pub const PROXY_PREFIX: &str = "/api";

/// Long AI-backed requests routinely take tens of seconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 120_000;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Ports that identify a directly addressed development backend.
const DIRECT_BACKEND_PORTS: &[&str] = &[":8000", ":8001"];

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL or path prefix every endpoint path is appended to
    pub api_base: String,
    pub timeout_ms: u64,
    /// `limit` used when loading dialog and assistant lists
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: PROXY_PREFIX.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Configuration baked in at build time from `CHAT_API_URL`.
    pub fn from_build_env() -> Self {
        Self {
            api_base: resolve_api_base(option_env!("CHAT_API_URL")),
            ..Self::default()
        }
    }

    /// Join an endpoint path (leading `/`) onto the base without doubling slashes.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }
}

/// An override is honoured only when it names a direct backend port;
/// anything else goes through the proxy prefix.
pub fn resolve_api_base(override_url: Option<&str>) -> String {
    match override_url.map(str::trim) {
        Some(url) if !url.is_empty() && DIRECT_BACKEND_PORTS.iter().any(|p| url.contains(p)) => {
            url.to_string()
        }
        _ => PROXY_PREFIX.to_string(),
    }
}
