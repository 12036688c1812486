//! DuckDuckGo image search engine implementation.
//!
//! Image results come from an internal JSON endpoint (`i.js`) that only
//! answers requests carrying a `vqd` session token. The token is embedded in
//! the inline script of the landing page, so every search is a two-stage
//! exchange: post the query to the root page, scrape the token, then walk the
//! paginated JSON results with it.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{header, Client};
use tracing::{debug, warn};
use url::Url;

use crate::{EngineConfig, ImageEngine, ImageSearchError, Result, ResultKind, ResultPage};

const TOKEN_PATTERN: &str = r#"(?i)vqd\s*=\s*['"]([\d-]+)['"]"#;

/// Short-lived session token required by the JSON results endpoint.
///
/// The empty token means "unavailable"; searching with it yields nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a scraped token value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The "unavailable" token.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns whether the token is the "unavailable" sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DuckDuckGo image search engine.
pub struct DuckDuckGoImages {
    config: EngineConfig,
    client: Client,
    base: Url,
    token_pattern: Regex,
}

impl DuckDuckGoImages {
    /// Creates a new DuckDuckGo image engine with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig {
            name: "DuckDuckGo Images".to_string(),
            ..Default::default()
        })
    }

    /// Creates an engine from custom configuration.
    ///
    /// The configured timeout bounds both the token and the search requests.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Self::with_client(config, client)
    }

    /// Creates an engine that sends its requests through `client`.
    pub fn with_client(config: EngineConfig, client: Client) -> Result<Self> {
        let base = Url::parse(&config.base_url)?;
        let token_pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| ImageSearchError::Parse(format!("Failed to compile token pattern: {:?}", e)))?;
        Ok(Self {
            config,
            client,
            base,
            token_pattern,
        })
    }

    /// Returns the root URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Obtains a session token for `query`.
    ///
    /// Every failure (transport, timeout, status, missing token) collapses to
    /// the empty token.
    pub async fn fetch_token(&self, query: &str) -> SessionToken {
        match self.try_fetch_token(query).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Token unavailable for '{}': {}", query, e);
                SessionToken::empty()
            }
        }
    }

    /// Obtains a session token for `query`, reporting why it is unavailable.
    pub async fn try_fetch_token(&self, query: &str) -> Result<SessionToken> {
        let response = self
            .client
            .post(self.base.clone())
            .form(&[("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        self.extract_token(&body)
            .ok_or(ImageSearchError::TokenNotFound)
    }

    /// Collects every result URL of the given kind, following continuation
    /// paths until the last page.
    ///
    /// A failing page ends the walk; the URLs gathered before it are returned.
    pub async fn fetch_results(
        &self,
        query: &str,
        token: &SessionToken,
        kind: ResultKind,
    ) -> Vec<String> {
        let mut urls = Vec::new();
        if token.is_empty() {
            debug!("No session token for '{}', skipping search", query);
            return urls;
        }

        let params = self.search_params(query, token);
        let mut endpoint = match self.base.join("i.js") {
            Ok(endpoint) => endpoint,
            Err(e) => {
                warn!("Invalid results endpoint: {}", e);
                return urls;
            }
        };

        let mut page_number = 1;
        loop {
            let page = match self.fetch_page(endpoint, &params).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        "Pagination interrupted at page {} after {} urls: {}",
                        page_number,
                        urls.len(),
                        e
                    );
                    return urls;
                }
            };

            let before = urls.len();
            urls.extend(page.urls(kind));
            debug!(
                "Page {} returned {} urls for '{}'",
                page_number,
                urls.len() - before,
                query
            );

            let Some(next) = page.next else {
                break;
            };
            endpoint = match self.base.join(&next) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    warn!("Invalid continuation path '{}': {}", next, e);
                    return urls;
                }
            };
            page_number += 1;
        }

        urls
    }

    async fn fetch_page(&self, endpoint: Url, params: &[(&str, &str)]) -> Result<ResultPage> {
        let response = self
            .client
            .get(endpoint)
            .query(params)
            .header(header::REFERER, self.base.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSearchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn search_params<'a>(&'a self, query: &'a str, token: &'a SessionToken) -> Vec<(&'a str, &'a str)> {
        vec![
            ("vqd", token.as_str()),
            ("q", query),
            ("l", self.config.locale.as_str()),
            ("o", "json"),
            ("f", ",,,"),
            ("p", "2"),
        ]
    }

    fn extract_token(&self, body: &str) -> Option<SessionToken> {
        self.token_pattern
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| SessionToken::new(m.as_str()))
    }
}

#[async_trait]
impl ImageEngine for DuckDuckGoImages {
    fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn search(&self, query: &str, kind: ResultKind) -> Vec<String> {
        let token = self.fetch_token(query).await;
        if token.is_empty() {
            return Vec::new();
        }
        self.fetch_results(query, &token, kind).await
    }
}
