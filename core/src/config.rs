//! Client configuration loaded from the environment.

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "POSTS_API_URL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read `POSTS_API_URL`, falling back to the local mock server address.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        lookup(BASE_URL_ENV)
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }
}
