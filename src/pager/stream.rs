//! Item stream adapter
//!
//! Exposes a full traversal as a `futures::Stream` of items, fetching pages
//! lazily instead of buffering the whole resource the way
//! [`all_items`](super::PageIterator::all_items) does.

use super::iterator::PageIterator;
use crate::client::PagedClient;
use crate::error::Result;
use crate::types::JsonValue;
use futures::stream::{self, Stream};
use std::collections::VecDeque;

impl<C: PagedClient> PageIterator<C> {
    /// Consume the iterator into a stream of items.
    ///
    /// The stream rewinds to page 1, then yields every item of every page
    /// in page order until the iterator becomes invalid. Each page is
    /// fetched only once its first item is polled for. A client failure
    /// ends the stream after yielding the error.
    pub fn into_item_stream(mut self) -> impl Stream<Item = Result<JsonValue>> {
        self.rewind();

        stream::try_unfold(
            (self, VecDeque::new()),
            |(mut pager, mut pending)| async move {
                loop {
                    if let Some(item) = pending.pop_front() {
                        return Ok(Some((item, (pager, pending))));
                    }
                    if !pager.valid() {
                        return Ok(None);
                    }
                    let page = pager.current().await?;
                    pager.advance();
                    pending = page.into_items().into();
                }
            },
        )
    }
}
