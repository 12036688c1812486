//! Image search engine trait and configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ResultKind;

/// Configuration for an image search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the engine.
    pub name: String,
    /// Root URL of the engine; token and results endpoints are resolved
    /// against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Region/locale code sent with every results request.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// User agent for token and search requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds, applied to token and search requests.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Whether the engine is enabled.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_base_url() -> String {
    "https://duckduckgo.com/".to_string()
}

fn default_locale() -> String {
    "wt-wt".to_string()
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_url: default_base_url(),
            locale: default_locale(),
            user_agent: default_user_agent(),
            timeout: default_timeout(),
            enabled: true,
        }
    }
}

/// Trait for implementing image search backends.
///
/// An engine turns a query into an ordered list of image URLs. Failures are
/// absorbed by the engine: an unavailable backend yields an empty (or
/// partial) list rather than an error.
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Returns the engine configuration.
    fn config(&self) -> &EngineConfig;

    /// Collects every result URL of the given kind for `query`.
    async fn search(&self, query: &str, kind: ResultKind) -> Vec<String>;

    /// Returns the engine name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Returns whether the engine is enabled.
    fn is_enabled(&self) -> bool {
        self.config().enabled
    }
}
