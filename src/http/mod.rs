//! HTTP client module
//!
//! A thin reqwest wrapper used by the listing fetcher.
//!
//! # Features
//!
//! - **Default Headers**: JSON content negotiation plus configured extras
//! - **Timeouts**: Per-client request timeout
//! - **Status Classification**: Non-success statuses become [`Error::HttpStatus`]
//!
//! The client never retries; retry policy belongs to the caller.
//!
//! [`Error::HttpStatus`]: crate::error::Error::HttpStatus

mod client;

pub use client::{HttpClient, HttpClientConfig};
