// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Listing Feed
//!
//! Cursor-paginated client for a marketplace listing feed.
//!
//! ## Features
//!
//! - **Listing Fetcher**: one authenticated POST per page, decoded into typed listings
//! - **Pagination Controller**: duplicate-free accumulation, end-of-feed detection,
//!   refresh with stale-response suppression, retry after failure
//! - **Async Driver**: a single tokio task owns the state; the UI sends commands
//!   and watches a published view
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listing_feed::{FeedConfig, FeedController, FilterParams, HttpListingFetcher};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> listing_feed::Result<()> {
//!     let config = FeedConfig::builder("https://api.example.com/search")
//!         .token("secret")
//!         .build();
//!     let fetcher = Arc::new(HttpListingFetcher::new(&config)?);
//!
//!     let (mut feed, _task) = FeedController::spawn(fetcher, FilterParams::default());
//!     feed.load_initial();
//!     let view = feed.wait_until_settled().await;
//!     println!("{} listings", view.listings.len());
//!
//!     feed.load_more();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 FeedHandle (presentation)                  │
//! │  load_initial()  load_more()  refresh()  retry()  view()   │
//! └─────────────────────────────┬──────────────────────────────┘
//!                               │ commands / watch
//! ┌─────────────────────────────┴──────────────────────────────┐
//! │                      FeedController                        │
//! │          FeedState (sans-IO)  ·  in-flight fetches         │
//! └─────────────────────────────┬──────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴─────────────┬────────────────┐
//! │   Fetcher    │      HTTP client           │    Decoder     │
//! ├──────────────┼────────────────────────────┼────────────────┤
//! │ SearchRequest│ POST JSON, bearer token    │ records field  │
//! │ start cursor │ timeout, status mapping    │ skip bad rows  │
//! └──────────────┴────────────────────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the feed
pub mod error;

/// Listing, page, cursor and filter types
pub mod types;

/// Feed configuration
pub mod config;

/// HTTP client
pub mod http;

/// Response decoding
pub mod decode;

/// Listing fetcher
pub mod fetcher;

/// Pagination state machine
pub mod pagination;

/// Async feed controller
pub mod controller;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchError, Result, USER_FACING_FETCH_MESSAGE};
pub use types::*;

pub use config::FeedConfig;
pub use controller::{FeedController, FeedHandle};
pub use fetcher::{HttpListingFetcher, ListingFetcher};
pub use pagination::{Completion, FeedState, FeedView, Phase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
