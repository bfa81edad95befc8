//! The page iterator

use super::types::{Page, PagerConfig};
use crate::client::{Continuation, PageRequest, PagedClient};
use crate::error::{Error, Result};
use crate::throttle::Delay;
use crate::types::{JsonValue, StringMap};
use std::collections::HashMap;
use tracing::debug;

/// A lazy cursor over the pages of one paged resource.
///
/// The iterator is bound to one client and one base query for its lifetime.
/// Pages are fetched on access through [`current`](Self::current) or
/// [`get`](Self::get) and cached in memory; the total page count starts out
/// unknown and is discovered from client responses (or forced via
/// [`set_count`](Self::set_count)).
///
/// Positions are 1-based. A position below 1, or above a known total, makes
/// the iterator invalid; [`valid`](Self::valid) must be re-checked after
/// every fetch because a fetch may newly discover the total.
pub struct PageIterator<C> {
    client: C,
    position: i64,
    total_pages: Option<u64>,
    cache: HashMap<i64, Page>,
    caching: bool,
    page_size: u64,
    query: StringMap,
    delay: Option<Delay>,
}

impl<C: PagedClient> PageIterator<C> {
    /// Create an iterator with the default configuration.
    pub fn new(client: C) -> Self {
        Self::from_parts(client, PagerConfig::default(), None)
    }

    /// Create an iterator with a custom configuration.
    ///
    /// Fails with [`Error::InvalidDelay`] when the configured delay pair is
    /// malformed; no client call is ever made for an invalid configuration.
    pub fn with_config(client: C, config: PagerConfig) -> Result<Self> {
        let delay = config.delay.map(Delay::try_from).transpose()?;
        Ok(Self::from_parts(client, config, delay))
    }

    fn from_parts(client: C, config: PagerConfig, delay: Option<Delay>) -> Self {
        Self {
            client,
            position: config.start_page,
            total_pages: None,
            cache: HashMap::new(),
            caching: config.caching,
            page_size: config.page_size,
            query: config.query,
            delay,
        }
    }

    /// Borrow the underlying client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Reset the position to the first page. No fetch occurs.
    pub fn rewind(&mut self) {
        self.position = 1;
    }

    /// The current position. No side effects.
    pub fn key(&self) -> i64 {
        self.position
    }

    /// Check whether the current position is a fetchable page: at least 1
    /// and, once a total is known, no greater than it.
    pub fn valid(&self) -> bool {
        if self.position < 1 {
            return false;
        }
        match self.total_pages {
            Some(total) => self.position as u64 <= total,
            None => true,
        }
    }

    /// Fetch the page at the current position.
    ///
    /// With caching enabled, a previously fetched position is served from
    /// memory without a client call (and without the configured delay).
    /// On a miss the client is called, the returned items are stored at the
    /// current position regardless of the caching flag, the continuation
    /// signal updates the known total, the query state is replaced with the
    /// batch's query, and the delay (if any) is awaited before returning.
    ///
    /// Client failures propagate unmodified.
    pub async fn current(&mut self) -> Result<Page> {
        if self.caching {
            if let Some(page) = self.cache.get(&self.position) {
                debug!("page {} served from cache", self.position);
                return Ok(page.clone());
            }
        }

        let request = PageRequest::new(self.position, self.page_size);
        let batch = self.client.list(&request, &self.query).await?;

        let page = Page::new(batch.items);
        // Write always; only the read path above respects the caching flag.
        self.cache.insert(self.position, page.clone());

        self.apply_continuation(batch.continuation);
        self.query = batch.query;

        debug!(
            "fetched page {} ({} items, total {:?})",
            self.position,
            page.len(),
            self.total_pages
        );

        if let Some(delay) = self.delay {
            delay.pause().await;
        }

        Ok(page)
    }

    /// Move to the next page.
    ///
    /// With caching disabled the entry for the position being left is
    /// discarded to bound memory. The new position is not validated here;
    /// it is checked on the next [`valid`](Self::valid) call.
    pub fn advance(&mut self) {
        if !self.caching {
            self.cache.remove(&self.position);
        }
        self.position += 1;
    }

    /// Force the position without validation or fetch.
    pub fn set_key(&mut self, position: i64) {
        self.position = position;
    }

    /// Set the position and validate it.
    ///
    /// The position is assigned before the validity check runs, so a failed
    /// move leaves [`key`](Self::key) at the rejected position.
    pub fn move_to(&mut self, position: i64) -> Result<()> {
        self.position = position;
        if self.valid() {
            Ok(())
        } else {
            Err(Error::invalid_position(position, self.total_pages))
        }
    }

    /// Validated random access: [`move_to`](Self::move_to) then
    /// [`current`](Self::current).
    pub async fn get(&mut self, position: i64) -> Result<Page> {
        self.move_to(position)?;
        self.current().await
    }

    /// The known total page count.
    ///
    /// Returns `None` until a total is discovered. A total of zero is also
    /// reported as `None`; [`valid`](Self::valid) still honors it, so a
    /// zero-total resource has no valid positions.
    pub fn count(&self) -> Option<u64> {
        self.total_pages.filter(|&total| total > 0)
    }

    /// Force-set the total page count, e.g. when known from elsewhere.
    pub fn set_count(&mut self, total: u64) {
        self.total_pages = Some(total);
    }

    /// Whether the cache read path is enabled
    pub fn cache_enabled(&self) -> bool {
        self.caching
    }

    /// Enable or disable the cache read path.
    ///
    /// Toggling has no side effect on existing cache contents.
    pub fn set_cache(&mut self, enabled: bool) {
        self.caching = enabled;
    }

    /// Drain every page from the first to the last into one flat,
    /// page-ordered item sequence.
    ///
    /// Rewinds, fetches while valid, then rewinds again before returning.
    /// Termination relies on the client eventually signaling an end or a
    /// concrete total.
    pub async fn all_items(&mut self) -> Result<Vec<JsonValue>> {
        self.rewind();

        let mut items = Vec::new();
        while self.valid() {
            let page = self.current().await?;
            items.extend(page.into_items());
            self.advance();
        }

        self.rewind();
        Ok(items)
    }

    fn apply_continuation(&mut self, continuation: Continuation) {
        match continuation {
            Continuation::End => {
                self.total_pages = Some(u64::try_from(self.position).unwrap_or(0));
            }
            Continuation::Total(total) => self.total_pages = Some(total),
            Continuation::Unknown => {}
        }
    }
}

impl<C> std::fmt::Debug for PageIterator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageIterator")
            .field("position", &self.position)
            .field("total_pages", &self.total_pages)
            .field("cached_pages", &self.cache.len())
            .field("caching", &self.caching)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}
