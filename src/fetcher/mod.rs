//! Listing fetcher
//!
//! One call to [`ListingFetcher::fetch`] is one POST to the search endpoint.
//! The fetcher does not retry and does not interpret pages; pagination
//! decisions belong to [`crate::pagination`].

mod request;

pub use request::SearchRequest;

use crate::config::FeedConfig;
use crate::decode::ListingDecoder;
use crate::error::{FetchError, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::{FilterParams, Page, PageToken};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Source of listing pages
#[async_trait]
pub trait ListingFetcher: Send + Sync {
    /// Fetch the page of listings below `cursor` that match `filters`
    async fn fetch(
        &self,
        cursor: &PageToken,
        filters: &FilterParams,
    ) -> std::result::Result<Page, FetchError>;
}

/// Fetcher backed by the remote HTTP search endpoint
#[derive(Debug)]
pub struct HttpListingFetcher {
    client: HttpClient,
    endpoint: String,
    token: String,
    user_type: String,
    version_number: String,
    start_cursor: Option<PageToken>,
    decoder: ListingDecoder,
}

impl HttpListingFetcher {
    /// Create a fetcher from a validated config
    pub fn new(config: &FeedConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(HttpClientConfig::from(&config.http))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim().to_string(),
            token: config.token.clone(),
            user_type: config.user_type.clone(),
            version_number: config.version_number.clone(),
            start_cursor: config
                .start_cursor
                .as_deref()
                .map(PageToken::from)
                .filter(|t| !t.is_start()),
            decoder: ListingDecoder::new(&config.records_field),
        })
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body for a cursor and filter set
    pub fn build_request<'a>(
        &'a self,
        cursor: &'a PageToken,
        filters: &'a FilterParams,
    ) -> SearchRequest<'a> {
        let cursor = match (&self.start_cursor, cursor.is_start()) {
            (Some(start), true) => start,
            _ => cursor,
        };

        SearchRequest {
            categories: &filters.categories,
            last_listing_id: cursor.as_str(),
            last_row_value: &filters.last_row_value,
            max: &filters.max,
            min: &filters.min,
            search: &filters.search,
            sort: &filters.sort,
            token: &self.token,
            user_type: &self.user_type,
            version_number: &self.version_number,
        }
    }
}

#[async_trait]
impl ListingFetcher for HttpListingFetcher {
    async fn fetch(
        &self,
        cursor: &PageToken,
        filters: &FilterParams,
    ) -> std::result::Result<Page, FetchError> {
        let request = self.build_request(cursor, filters);
        debug!("Fetching listings below cursor '{}'", request.last_listing_id);

        let body = match self.client.post_json(&self.endpoint, &request).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Listing fetch failed: {e}");
                return Err(e.into());
            }
        };

        let page = self.decoder.decode(&body);
        debug!(
            "Received {} listings for cursor '{}'",
            page.len(),
            request.last_listing_id
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests;
