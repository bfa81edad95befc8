//! Tests for the pager module

use super::*;
use crate::client::{Continuation, PageBatch, PageRequest, PagedClient};
use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use async_trait::async_trait;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use test_case::test_case;

// ============================================================================
// Scripted client
// ============================================================================

/// How the scripted client reports the end of the resource
enum Signal {
    /// Every response carries a concrete total
    Total,
    /// The response for the last scripted page carries an end sentinel
    EndAtLast,
    /// Responses never say anything about the total
    Silent,
}

/// An in-memory client serving a fixed script of pages
struct ScriptedClient {
    pages: Vec<Vec<JsonValue>>,
    signal: Signal,
    calls: AtomicUsize,
    last_query: Mutex<StringMap>,
}

impl ScriptedClient {
    fn new(pages: Vec<Vec<JsonValue>>, signal: Signal) -> Arc<Self> {
        Arc::new(Self {
            pages,
            signal,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(StringMap::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> StringMap {
        self.last_query.lock().unwrap().clone()
    }
}

#[async_trait]
impl PagedClient for ScriptedClient {
    async fn list(&self, request: &PageRequest, query: &StringMap) -> Result<PageBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = query.clone();

        let index = usize::try_from(request.page - 1).ok();
        let items = index
            .and_then(|i| self.pages.get(i))
            .cloned()
            .unwrap_or_default();

        let continuation = match self.signal {
            Signal::Total => Continuation::Total(self.pages.len() as u64),
            Signal::EndAtLast if request.page >= self.pages.len() as i64 => Continuation::End,
            Signal::EndAtLast | Signal::Silent => Continuation::Unknown,
        };

        Ok(PageBatch::new(items)
            .with_continuation(continuation)
            .with_query(query.clone()))
    }
}

/// A client that hands a fresh token to every response
struct TokenClient {
    last_query: Mutex<StringMap>,
}

#[async_trait]
impl PagedClient for TokenClient {
    async fn list(&self, request: &PageRequest, query: &StringMap) -> Result<PageBatch> {
        *self.last_query.lock().unwrap() = query.clone();

        let mut next_query = query.clone();
        next_query.insert("token".to_string(), format!("tok-{}", request.page));

        let continuation = if request.page >= 3 {
            Continuation::End
        } else {
            Continuation::Unknown
        };

        Ok(PageBatch::new(vec![json!({"page": request.page})])
            .with_continuation(continuation)
            .with_query(next_query))
    }
}

fn three_pages() -> Vec<Vec<JsonValue>> {
    vec![
        vec![json!({"id": 1}), json!({"id": 2})],
        vec![json!({"id": 3}), json!({"id": 4})],
        vec![json!({"id": 5}), json!({"id": 6})],
    ]
}

// ============================================================================
// Construction and position tracking
// ============================================================================

#[test]
fn test_new_starts_at_page_one() {
    let pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    assert_eq!(pager.key(), 1);
    assert!(pager.cache_enabled());
    assert_eq!(pager.count(), None);
}

#[test]
fn test_with_config_start_page() {
    let config = PagerConfig::builder().start_page(5).build();
    let pager =
        PageIterator::with_config(ScriptedClient::new(three_pages(), Signal::Total), config)
            .unwrap();
    assert_eq!(pager.key(), 5);
}

#[test]
fn test_with_config_rejects_negative_delay() {
    let config = PagerConfig::builder().delay(-1, 0).build();
    let err = PageIterator::with_config(ScriptedClient::new(vec![], Signal::Silent), config)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDelay { .. }));
}

#[test]
fn test_config_from_value() {
    let config = PagerConfig::from_value(&json!({
        "start_page": 2,
        "page_size": 10,
        "caching": false,
    }))
    .unwrap();
    assert_eq!(config.start_page, 2);
    assert_eq!(config.page_size, 10);
    assert!(!config.caching);
    assert!(config.delay.is_none());
}

#[test]
fn test_rewind_resets_position() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    pager.set_key(42);
    pager.rewind();
    assert_eq!(pager.key(), 1);
}

#[test]
fn test_advance_moves_forward() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    pager.advance();
    pager.advance();
    assert_eq!(pager.key(), 3);
}

// ============================================================================
// Validity
// ============================================================================

#[test_case(0; "zero")]
#[test_case(-1; "negative")]
#[test_case(-42; "deeply negative")]
fn test_positions_below_one_are_invalid(position: i64) {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    pager.set_key(position);
    assert!(!pager.valid());
}

#[test]
fn test_valid_with_unknown_total() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    pager.set_key(1_000_000);
    assert!(pager.valid());
}

#[test]
fn test_valid_respects_known_total() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    pager.set_count(3);

    for position in 1..=3 {
        pager.set_key(position);
        assert!(pager.valid(), "page {position} should be valid");
    }

    pager.set_key(4);
    assert!(!pager.valid());
}

#[test]
fn test_zero_total_invalidates_everything_but_count_reads_unknown() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Total));
    pager.set_count(0);

    // An explicit zero cannot be told apart from unknown through count().
    assert_eq!(pager.count(), None);
    assert!(!pager.valid());
}

#[test]
fn test_set_count_then_count() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    assert_eq!(pager.count(), None);
    pager.set_count(7);
    assert_eq!(pager.count(), Some(7));
}

// ============================================================================
// Fetching and caching
// ============================================================================

#[tokio::test]
async fn test_current_fetches_lazily() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    assert_eq!(client.calls(), 0);
    let page = pager.current().await.unwrap();
    assert_eq!(page.items(), &[json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_current_twice_is_one_call() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    let first = pager.current().await.unwrap();
    let second = pager.current().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_current_discovers_total() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    assert_eq!(pager.count(), None);
    pager.current().await.unwrap();
    assert_eq!(pager.count(), Some(3));
}

#[tokio::test]
async fn test_caching_disabled_refetches() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let config = PagerConfig::builder().no_cache().build();
    let mut pager = PageIterator::with_config(client.clone(), config).unwrap();

    pager.current().await.unwrap();
    pager.current().await.unwrap();
    assert_eq!(client.calls(), 2);

    // The store is unconditional, so re-enabling the read path turns the
    // already-written entry into a hit.
    pager.set_cache(true);
    pager.current().await.unwrap();
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_advance_evicts_when_caching_disabled() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let config = PagerConfig::builder().no_cache().build();
    let mut pager = PageIterator::with_config(client.clone(), config).unwrap();

    pager.current().await.unwrap();
    pager.advance();
    pager.set_cache(true);

    pager.move_to(1).unwrap();
    pager.current().await.unwrap();
    assert_eq!(client.calls(), 2, "evicted page must be refetched");
}

#[tokio::test]
async fn test_advance_keeps_entry_when_caching_enabled() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    pager.current().await.unwrap();
    pager.advance();
    pager.move_to(1).unwrap();
    pager.current().await.unwrap();

    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_query_state_replaced_by_client() {
    let client = Arc::new(TokenClient {
        last_query: Mutex::new(StringMap::new()),
    });
    let mut pager = PageIterator::new(client.clone());

    pager.current().await.unwrap();
    pager.advance();
    pager.current().await.unwrap();

    // The second request must carry the token handed out by the first.
    let seen = client.last_query.lock().unwrap().clone();
    assert_eq!(seen.get("token"), Some(&"tok-1".to_string()));
}

#[tokio::test]
async fn test_base_query_reaches_client() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let config = PagerConfig::builder()
        .query_param("status", "active")
        .build();
    let mut pager = PageIterator::with_config(client.clone(), config).unwrap();

    pager.current().await.unwrap();
    assert_eq!(
        client.last_query().get("status"),
        Some(&"active".to_string())
    );
}

// ============================================================================
// Random access
// ============================================================================

#[tokio::test]
async fn test_get_moves_and_fetches() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    let page = pager.get(2).await.unwrap();
    assert_eq!(page.items(), &[json!({"id": 3}), json!({"id": 4})]);
    assert_eq!(pager.key(), 2);
}

#[test]
fn test_move_to_rejects_non_positive() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    let err = pager.move_to(0).unwrap_err();
    assert!(matches!(err, Error::InvalidPosition { position: 0, .. }));
}

#[test]
fn test_move_to_rejects_past_known_total() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    pager.set_count(3);

    let err = pager.move_to(5).unwrap_err();
    match err {
        Error::InvalidPosition {
            position,
            total_pages,
        } => {
            assert_eq!(position, 5);
            assert_eq!(total_pages, Some(3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_failed_move_does_not_roll_back() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    pager.set_count(3);

    assert!(pager.move_to(5).is_err());
    // Assign-then-validate: the rejected position sticks.
    assert_eq!(pager.key(), 5);
    assert!(!pager.valid());

    pager.rewind();
    assert!(pager.valid());
}

#[test]
fn test_set_key_skips_validation() {
    let mut pager = PageIterator::new(ScriptedClient::new(three_pages(), Signal::Silent));
    pager.set_count(3);
    pager.set_key(99);
    assert_eq!(pager.key(), 99);
}

// ============================================================================
// Full traversal
// ============================================================================

#[tokio::test]
async fn test_all_items_with_upfront_total() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    let items = pager.all_items().await.unwrap();

    let ids: Vec<i64> = items.iter().map(|item| item["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(pager.count(), Some(3));
    assert_eq!(pager.key(), 1, "traversal rewinds before returning");
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_all_items_restarts_from_page_one() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let mut pager = PageIterator::new(client.clone());

    pager.set_key(3);
    let items = pager.all_items().await.unwrap();
    assert_eq!(items.len(), 6);
}

#[tokio::test]
async fn test_sequential_iteration_stops_on_end_sentinel() {
    // Three real pages, then an empty page 4 carrying the end signal.
    let mut pages = three_pages();
    pages.push(vec![]);
    let client = ScriptedClient::new(pages, Signal::EndAtLast);
    let mut pager = PageIterator::new(client.clone());

    let mut visited = Vec::new();
    pager.rewind();
    while pager.valid() {
        assert_eq!(pager.count(), None, "total is unknown until the sentinel");
        pager.current().await.unwrap();
        visited.push(pager.key());
        pager.advance();
    }

    assert_eq!(visited, vec![1, 2, 3, 4]);
    assert_eq!(pager.count(), Some(4));
    assert_eq!(client.calls(), 4);
}

#[tokio::test]
async fn test_item_stream_matches_all_items() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let pager = PageIterator::new(client);

    let items: Vec<JsonValue> = pager.into_item_stream().try_collect().await.unwrap();
    let ids: Vec<i64> = items.iter().map(|item| item["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

// ============================================================================
// Throttling
// ============================================================================

#[tokio::test]
async fn test_delay_applies_on_miss_only() {
    let client = ScriptedClient::new(three_pages(), Signal::Total);
    let config = PagerConfig::builder().delay(0, 100_000_000).build();
    let mut pager = PageIterator::with_config(client, config).unwrap();

    let start = Instant::now();
    pager.current().await.unwrap();
    assert!(
        start.elapsed() >= Duration::from_millis(100),
        "cache miss must pause"
    );

    let start = Instant::now();
    pager.current().await.unwrap();
    assert!(
        start.elapsed() < Duration::from_millis(50),
        "cache hit must not pause"
    );
}
