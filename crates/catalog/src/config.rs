//! Catalog client configuration from the environment and `.env`.

use serde::Deserialize;

/// Catalog client configuration loaded from `TMDB_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// API key; when absent every request fails with `NotConfigured`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the catalog API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language tag sent with every request
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            language: default_language(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("TMDB_")
            .from_env::<CatalogConfig>()
            .map_err(|e| anyhow::anyhow!("Failed to load catalog config: {}", e))
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
