//! Types crossing the client boundary

use crate::types::{JsonValue, StringMap};

// ============================================================================
// Page Request
// ============================================================================

/// Parameters of a single paged list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page index. Non-positive values never pass iterator
    /// validation, but the request type can represent them.
    pub page: i64,
    /// Number of items requested per page
    pub limit: u64,
}

impl PageRequest {
    /// Create a new page request
    pub fn new(page: i64, limit: u64) -> Self {
        Self { page, limit }
    }
}

// ============================================================================
// Continuation
// ============================================================================

/// Per-call indication of whether more pages exist and, if known, how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Continuation {
    /// The response said nothing about the total; keep going
    #[default]
    Unknown,
    /// The page just returned is the last one
    End,
    /// The resource has exactly this many pages
    Total(u64),
}

impl Continuation {
    /// Check if this signals the end of the resource
    pub fn is_end(self) -> bool {
        matches!(self, Self::End)
    }

    /// The concrete total, if the response carried one
    pub fn total(self) -> Option<u64> {
        match self {
            Self::Total(total) => Some(total),
            _ => None,
        }
    }
}

// ============================================================================
// Page Batch
// ============================================================================

/// The typed result of one paged list call: the items of the page, a
/// continuation signal, and the query parameters for the next call.
#[derive(Debug, Clone, Default)]
pub struct PageBatch {
    /// The items of the fetched page
    pub items: Vec<JsonValue>,
    /// Whether more pages exist
    pub continuation: Continuation,
    /// Query parameters the next request should carry
    pub query: StringMap,
}

impl PageBatch {
    /// Create a batch with an unknown continuation and empty query.
    ///
    /// Callers implementing [`PagedClient`](super::PagedClient) should
    /// almost always attach a query via [`with_query`](Self::with_query) —
    /// the iterator replaces its query state with the batch's query.
    pub fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items,
            continuation: Continuation::Unknown,
            query: StringMap::new(),
        }
    }

    /// Set the continuation signal
    #[must_use]
    pub fn with_continuation(mut self, continuation: Continuation) -> Self {
        self.continuation = continuation;
        self
    }

    /// Set the query parameters for the next request
    #[must_use]
    pub fn with_query(mut self, query: StringMap) -> Self {
        self.query = query;
        self
    }
}
