//! Paged client contract
//!
//! Defines the boundary between the page iterator and whatever actually
//! performs the list calls: a single-operation async trait returning one
//! typed batch per call, plus the bundled reqwest-backed implementation.

mod http;
mod types;

pub use http::{HttpClientConfig, HttpClientConfigBuilder, HttpPagedClient};
pub use types::{Continuation, PageBatch, PageRequest};

use crate::error::Result;
use crate::types::StringMap;
use async_trait::async_trait;
use std::sync::Arc;

/// A client that returns list data one page at a time.
///
/// Implementations fetch the requested page and report, alongside the items,
/// a [`Continuation`] signal and the query parameters the *next* request
/// should carry. Start from the query you were given and update it as
/// needed (for example, inserting a continuation token); the iterator
/// replaces its query state with whatever is returned, so dropping entries
/// here drops them from every subsequent call.
///
/// For full traversals to terminate, an implementation must eventually
/// signal [`Continuation::End`] or a concrete [`Continuation::Total`].
#[async_trait]
pub trait PagedClient: Send + Sync {
    /// Fetch one page of the resource.
    async fn list(&self, request: &PageRequest, query: &StringMap) -> Result<PageBatch>;
}

#[async_trait]
impl<C> PagedClient for Arc<C>
where
    C: PagedClient + ?Sized,
{
    async fn list(&self, request: &PageRequest, query: &StringMap) -> Result<PageBatch> {
        self.as_ref().list(request, query).await
    }
}
