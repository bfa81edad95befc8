//! Page and configuration types for the iterator

use crate::error::Result;
use crate::throttle::DelayConfig;
use crate::types::{JsonValue, StringMap};
use serde::{Deserialize, Serialize};

// ============================================================================
// Page
// ============================================================================

/// One batch of items returned by a single paged list call.
///
/// Pages are owned and cloneable; every copy iterates from the first item.
/// The iterator never inspects item contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    items: Vec<JsonValue>,
}

impl Page {
    /// Create a page from its items
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self { items }
    }

    /// Create a page with no items
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of items on the page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the items
    pub fn items(&self) -> &[JsonValue] {
        &self.items
    }

    /// Consume the page into its items
    pub fn into_items(self) -> Vec<JsonValue> {
        self.items
    }

    /// Iterate the items from the start
    pub fn iter(&self) -> std::slice::Iter<'_, JsonValue> {
        self.items.iter()
    }
}

impl From<Vec<JsonValue>> for Page {
    fn from(items: Vec<JsonValue>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for Page {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Page {
    type Item = &'a JsonValue;
    type IntoIter = std::slice::Iter<'a, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Construction-time configuration for a [`PageIterator`](super::PageIterator)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Initial position, 1-based
    pub start_page: i64,
    /// Items requested per page
    pub page_size: u64,
    /// Base query parameters merged into every client call
    pub query: StringMap,
    /// Whether fetched pages are served from memory on repeat access
    pub caching: bool,
    /// Pause applied after every cache-miss fetch
    pub delay: Option<DelayConfig>,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            start_page: 1,
            page_size: 100,
            query: StringMap::new(),
            caching: true,
            delay: None,
        }
    }
}

impl PagerConfig {
    /// Create a new config builder
    pub fn builder() -> PagerConfigBuilder {
        PagerConfigBuilder::default()
    }

    /// Parse a config from an untyped JSON value.
    ///
    /// Missing fields take their defaults. Delay component validation
    /// happens when the iterator is constructed.
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let config = serde_json::from_value(value.clone())?;
        Ok(config)
    }
}

/// Builder for [`PagerConfig`]
#[derive(Default)]
pub struct PagerConfigBuilder {
    config: PagerConfig,
}

impl PagerConfigBuilder {
    /// Set the starting page index
    pub fn start_page(mut self, page: i64) -> Self {
        self.config.start_page = page;
        self
    }

    /// Set the number of items requested per page
    pub fn page_size(mut self, size: u64) -> Self {
        self.config.page_size = size;
        self
    }

    /// Add a base query parameter
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.query.insert(key.into(), value.into());
        self
    }

    /// Replace the base query parameters
    pub fn query(mut self, query: StringMap) -> Self {
        self.config.query = query;
        self
    }

    /// Enable or disable page caching
    pub fn caching(mut self, enabled: bool) -> Self {
        self.config.caching = enabled;
        self
    }

    /// Disable page caching
    pub fn no_cache(mut self) -> Self {
        self.config.caching = false;
        self
    }

    /// Set the post-fetch delay as a `(secs, nanos)` pair.
    ///
    /// The pair is validated when the iterator is constructed.
    pub fn delay(mut self, secs: i64, nanos: i64) -> Self {
        self.config.delay = Some(DelayConfig::new(secs, nanos));
        self
    }

    /// Build the config
    pub fn build(self) -> PagerConfig {
        self.config
    }
}
