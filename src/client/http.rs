//! Bundled reqwest-backed paged client
//!
//! A [`PagedClient`] implementation for JSON HTTP APIs that paginate by
//! page-number query parameters. Where the item array, the total page
//! count, or a continuation cursor live in the response body is
//! configurable as dotted paths.
//!
//! The client performs no retries and no authentication; failures surface
//! to the caller as-is.

use super::types::{Continuation, PageBatch, PageRequest};
use super::PagedClient;
use crate::error::{Error, Result, ResultExt};
use crate::types::{extract_path, JsonValue, StringMap};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the bundled HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Default headers sent with every request
    pub default_headers: StringMap,
    /// Query parameter carrying the page index
    pub page_param: String,
    /// Query parameter carrying the page size
    pub limit_param: String,
    /// Dotted path to the item array in the response body; `None` means the
    /// body itself is the array
    pub items_path: Option<String>,
    /// Dotted path to a concrete total page count, if the API reports one
    pub total_pages_path: Option<String>,
    /// Query parameter to carry an extracted cursor into the next request
    pub cursor_param: Option<String>,
    /// Dotted path to the continuation cursor in the response body
    pub cursor_path: Option<String>,
    /// Treat an empty item array as the end of the resource
    pub end_on_empty: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("pagekit/{}", env!("CARGO_PKG_VERSION")),
            default_headers: StringMap::new(),
            page_param: "page".to_string(),
            limit_param: "limit".to_string(),
            items_path: None,
            total_pages_path: None,
            cursor_param: None,
            cursor_path: None,
            end_on_empty: true,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the page and limit query parameter names
    pub fn page_params(mut self, page: impl Into<String>, limit: impl Into<String>) -> Self {
        self.config.page_param = page.into();
        self.config.limit_param = limit.into();
        self
    }

    /// Set the dotted path to the item array
    pub fn items_path(mut self, path: impl Into<String>) -> Self {
        self.config.items_path = Some(path.into());
        self
    }

    /// Set the dotted path to the total page count
    pub fn total_pages_path(mut self, path: impl Into<String>) -> Self {
        self.config.total_pages_path = Some(path.into());
        self
    }

    /// Thread a cursor from the response body into the next request
    pub fn cursor(mut self, param: impl Into<String>, path: impl Into<String>) -> Self {
        self.config.cursor_param = Some(param.into());
        self.config.cursor_path = Some(path.into());
        self
    }

    /// Do not treat an empty item array as the end of the resource
    pub fn keep_going_on_empty(mut self) -> Self {
        self.config.end_on_empty = false;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

// ============================================================================
// Client
// ============================================================================

/// A [`PagedClient`] over a JSON HTTP endpoint
pub struct HttpPagedClient {
    client: reqwest::Client,
    endpoint: Url,
    config: HttpClientConfig,
}

impl HttpPagedClient {
    /// Create a client for an endpoint with the default configuration
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        Self::with_config(endpoint, HttpClientConfig::default())
    }

    /// Create a client for an endpoint with a custom configuration
    pub fn with_config(endpoint: impl AsRef<str>, config: HttpClientConfig) -> Result<Self> {
        let endpoint = Url::parse(endpoint.as_ref())?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// The endpoint this client fetches from
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn extract_items(&self, body: &JsonValue) -> Result<Vec<JsonValue>> {
        let located = match &self.config.items_path {
            Some(path) => extract_path(body, path)
                .ok_or_else(|| Error::extraction(path.as_str(), "path not found in response"))?,
            None => body,
        };

        located.as_array().cloned().ok_or_else(|| {
            Error::extraction(
                self.config.items_path.as_deref().unwrap_or("$"),
                "expected a JSON array of items",
            )
        })
    }

    fn extract_cursor(&self, body: &JsonValue) -> Option<String> {
        let path = self.config.cursor_path.as_ref()?;
        match extract_path(body, path)? {
            JsonValue::String(cursor) if !cursor.is_empty() => Some(cursor.clone()),
            JsonValue::Number(cursor) => Some(cursor.to_string()),
            _ => None,
        }
    }

    fn continuation(&self, body: &JsonValue, items_len: usize, cursor: Option<&str>) -> Continuation {
        if let Some(path) = &self.config.total_pages_path {
            if let Some(total) = extract_path(body, path).and_then(JsonValue::as_u64) {
                return Continuation::Total(total);
            }
        }

        if self.config.cursor_path.is_some() && cursor.is_none() {
            return Continuation::End;
        }

        if self.config.end_on_empty && items_len == 0 {
            return Continuation::End;
        }

        Continuation::Unknown
    }
}

#[async_trait]
impl PagedClient for HttpPagedClient {
    async fn list(&self, request: &PageRequest, query: &StringMap) -> Result<PageBatch> {
        let mut req = self.client.get(self.endpoint.clone());

        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let mut params: Vec<(&str, String)> = query
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        params.push((self.config.page_param.as_str(), request.page.to_string()));
        params.push((self.config.limit_param.as_str(), request.limit.to_string()));

        let response = req.query(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let text = response
            .text()
            .await
            .context("failed to read response body")?;
        let body: JsonValue = serde_json::from_str(&text)?;

        let items = self.extract_items(&body)?;
        let cursor = self.extract_cursor(&body);
        let continuation = self.continuation(&body, items.len(), cursor.as_deref());

        let mut next_query = query.clone();
        if let (Some(param), Some(cursor)) = (&self.config.cursor_param, cursor) {
            next_query.insert(param.clone(), cursor);
        }

        debug!(
            "fetched page {} ({} items, {:?})",
            request.page,
            items.len(),
            continuation
        );

        Ok(PageBatch {
            items,
            continuation,
            query: next_query,
        })
    }
}

impl std::fmt::Debug for HttpPagedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPagedClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
