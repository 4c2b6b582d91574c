//! Feed state machine

use super::merge::Collection;
use super::types::{Completion, FeedView, FetchKind, FetchRequest, MergeOutcome, Phase};
use crate::error::FetchError;
use crate::types::{FilterParams, Listing, Page, PageToken};
use tracing::{debug, info, warn};

/// Pagination state owned by one feed session
///
/// Holds the collection, cursor, exhaustion flag, phase and the single
/// outstanding request. All transitions go through the lifecycle methods and
/// [`FeedState::complete`].
#[derive(Debug, Clone)]
pub struct FeedState {
    collection: Collection,
    cursor: PageToken,
    exhausted: bool,
    phase: Phase,
    last_error: Option<FetchError>,
    filters: FilterParams,
    /// Bumped on every accepted refresh
    generation: u64,
    next_ticket: u64,
    started: bool,
    /// Outstanding request, or the failed one while in `Error`
    pending: Option<FetchRequest>,
}

impl FeedState {
    /// Create a fresh state for the given filters
    pub fn new(filters: FilterParams) -> Self {
        Self {
            collection: Collection::new(),
            cursor: PageToken::start(),
            exhausted: false,
            phase: Phase::Idle,
            last_error: None,
            filters,
            generation: 0,
            next_ticket: 0,
            started: false,
            pending: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Listings in display order
    pub fn listings(&self) -> &[Listing] {
        self.collection.listings()
    }

    /// Current cursor
    pub fn cursor(&self) -> &PageToken {
        &self.cursor
    }

    /// Whether the end of data has been reached
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Detailed error of the last failed fetch
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Current refresh generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Filters sent with every request
    pub fn filters(&self) -> &FilterParams {
        &self.filters
    }

    /// The outstanding request, if any
    pub fn in_flight(&self) -> Option<&FetchRequest> {
        self.pending.as_ref().filter(|_| self.phase.is_loading())
    }

    /// Build the read-only projection
    pub fn view(&self) -> FeedView {
        FeedView {
            listings: self.collection.listings().to_vec(),
            is_loading_initial: self.phase == Phase::LoadingInitial,
            is_loading_more: self.phase == Phase::LoadingMore,
            is_refreshing: self.phase == Phase::Refreshing,
            error: self
                .last_error
                .as_ref()
                .map(|e| e.user_message().to_string()),
            exhausted: self.exhausted,
            phase: self.phase,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start the first fetch of the session
    ///
    /// Only the first call of a fresh session does anything.
    pub fn load_initial(&mut self) -> Option<FetchRequest> {
        if self.started || self.phase != Phase::Idle {
            return None;
        }
        self.started = true;
        Some(self.issue(FetchKind::Initial))
    }

    /// Fetch the next page
    ///
    /// A no-op unless the feed is idle, not exhausted, and a first page has
    /// established a cursor.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if self.phase != Phase::Idle || self.exhausted || self.cursor.is_start() {
            return None;
        }
        Some(self.issue(FetchKind::More))
    }

    /// Drop everything and fetch the first page again
    ///
    /// Supersedes any in-flight load; a no-op while a refresh is in flight.
    pub fn refresh(&mut self) -> Option<FetchRequest> {
        if self.phase == Phase::Refreshing {
            return None;
        }

        if let Some(superseded) = self.in_flight() {
            debug!(
                "Refresh supersedes in-flight {:?} fetch (ticket {})",
                superseded.kind, superseded.ticket
            );
        }

        self.generation += 1;
        self.collection.clear();
        self.cursor = PageToken::start();
        self.exhausted = false;
        self.started = true;
        Some(self.issue(FetchKind::Refresh))
    }

    /// Re-issue the request that last failed
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.phase != Phase::Error {
            return None;
        }
        let failed = self.pending.clone()?;

        self.phase = failed.kind.phase(true);
        self.last_error = None;
        debug!(
            "Retrying {:?} fetch with cursor '{}'",
            failed.kind, failed.cursor
        );
        Some(failed)
    }

    /// Apply the result of a fetch
    pub fn complete(
        &mut self,
        request: &FetchRequest,
        result: Result<Page, FetchError>,
    ) -> Completion {
        if request.generation != self.generation {
            debug!(
                "Discarding response from generation {} (current {})",
                request.generation, self.generation
            );
            return Completion::Stale;
        }
        if self.in_flight().map(|p| p.ticket) != Some(request.ticket) {
            debug!("Discarding response for ticket {}", request.ticket);
            return Completion::Stale;
        }

        match result {
            Ok(page) => Completion::Applied(self.apply_page(page)),
            Err(err) => {
                warn!("{:?} fetch failed: {err}", request.kind);
                self.phase = Phase::Error;
                self.last_error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn issue(&mut self, kind: FetchKind) -> FetchRequest {
        let request = FetchRequest {
            ticket: self.next_ticket,
            generation: self.generation,
            kind,
            cursor: self.cursor.clone(),
            filters: self.filters.clone(),
        };
        self.next_ticket += 1;
        self.phase = kind.phase(false);
        self.last_error = None;
        self.pending = Some(request.clone());
        request
    }

    fn apply_page(&mut self, page: Page) -> MergeOutcome {
        let outcome = self.collection.merge(page);

        if let Some(min_id) = outcome.min_id {
            self.cursor = PageToken::from_id(min_id);
        }
        if outcome.exhausted {
            self.exhausted = true;
            info!(
                "Feed exhausted after {} listings ({} received, none new)",
                self.collection.len(),
                outcome.received
            );
        } else {
            debug!(
                "Appended {} of {} listings, next cursor '{}'",
                outcome.appended, outcome.received, self.cursor
            );
        }

        self.phase = Phase::Idle;
        self.pending = None;
        outcome
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(FilterParams::default())
    }
}
