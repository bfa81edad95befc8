//! # pagekit
//!
//! A minimal, Rust-native pagination layer for paged list APIs.
//!
//! pagekit sits in front of any client that returns list data one page at a
//! time. It lets a caller walk every item of a paged resource without
//! knowing how many pages exist up front, caches already-fetched pages to
//! avoid redundant calls, and can pause after each fetch to stay under an
//! external rate limit.
//!
//! ## Features
//!
//! - **Lazy page cursor**: pages are fetched on access, never eagerly
//! - **Unknown totals**: the total page count is discovered from responses
//! - **In-memory page cache**: repeat access to a page is free
//! - **Cursor threading**: continuation tokens are carried into the next call
//! - **Throttling**: an optional fixed delay after every cache-miss fetch
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagekit::{HttpClientConfig, HttpPagedClient, PageIterator, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .items_path("data")
//!         .total_pages_path("meta.total_pages")
//!         .build();
//!     let client = HttpPagedClient::with_config("https://api.example.com/users", config)?;
//!
//!     let mut pages = PageIterator::new(client);
//!     for item in pages.all_items().await? {
//!         // process item
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]

/// Error types for pagekit
pub mod error;

/// Common type aliases and JSON helpers
pub mod types;

/// Paged client contract and the bundled HTTP implementation
pub mod client;

/// The page iterator state machine
pub mod pager;

/// Post-fetch throttling delay
pub mod throttle;

pub use client::{Continuation, HttpClientConfig, HttpPagedClient, PageBatch, PageRequest, PagedClient};
pub use error::{Error, Result, ResultExt};
pub use pager::{Page, PageIterator, PagerConfig};
pub use throttle::{Delay, DelayConfig};
pub use types::{JsonObject, JsonValue, StringMap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
