//! Pagination types
//!
//! Phases, fetch descriptors, merge outcomes and the read-only projection.

use crate::error::FetchError;
use crate::types::{FilterParams, Listing, ListingId, PageToken};
use serde::Serialize;

/// Lifecycle phase of the feed
///
/// Any phase other than `Idle` and `Error` means exactly one fetch is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No fetch in flight
    #[default]
    Idle,
    /// First page (or a retried first page) in flight
    LoadingInitial,
    /// Next page in flight
    LoadingMore,
    /// Refresh in flight; the collection has been cleared
    Refreshing,
    /// The last fetch failed
    Error,
}

impl Phase {
    /// Check if a fetch is outstanding
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Self::LoadingInitial | Self::LoadingMore | Self::Refreshing
        )
    }
}

/// Why a fetch was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// First page of a session
    Initial,
    /// Next page below the current cursor
    More,
    /// First page after a refresh
    Refresh,
}

impl FetchKind {
    /// Phase entered while a fetch of this kind is in flight
    ///
    /// A retried refresh shows as an initial load.
    pub(crate) fn phase(self, retry: bool) -> Phase {
        match (self, retry) {
            (Self::Initial, _) | (Self::Refresh, true) => Phase::LoadingInitial,
            (Self::More, _) => Phase::LoadingMore,
            (Self::Refresh, false) => Phase::Refreshing,
        }
    }
}

/// A fetch the caller must perform
///
/// Requests are tagged with the generation they were issued in and a ticket
/// unique within the feed's lifetime; completions are matched on both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Unique ticket of this request
    pub ticket: u64,
    /// Refresh generation the request belongs to
    pub generation: u64,
    /// Why the fetch was issued
    pub kind: FetchKind,
    /// Cursor to send
    pub cursor: PageToken,
    /// Filters to send
    pub filters: FilterParams,
}

/// Result of merging one page into the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeOutcome {
    /// Listings in the fetched page
    pub received: usize,
    /// Previously unseen listings appended
    pub appended: usize,
    /// Smallest id in the fetched page
    pub min_id: Option<ListingId>,
    /// Whether the page signalled the end of data
    pub exhausted: bool,
}

/// What [`crate::pagination::FeedState::complete`] did with a result
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The page was merged
    Applied(MergeOutcome),
    /// The fetch failed; the feed is now in `Error`
    Failed(FetchError),
    /// The result belonged to a superseded request and was discarded
    Stale,
}

impl Completion {
    /// Check if the completion was discarded
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

/// Read-only projection rendered by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedView {
    /// Listings in display order
    pub listings: Vec<Listing>,
    /// First page loading
    pub is_loading_initial: bool,
    /// Next page loading
    pub is_loading_more: bool,
    /// Refresh loading
    pub is_refreshing: bool,
    /// User-facing error message
    pub error: Option<String>,
    /// No further listings for the current filters
    pub exhausted: bool,
    /// Current phase
    pub phase: Phase,
}

impl FeedView {
    /// Check if any fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading_initial || self.is_loading_more || self.is_refreshing
    }
}
