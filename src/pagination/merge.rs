//! Duplicate-free listing collection

use super::types::MergeOutcome;
use crate::types::{Listing, ListingId, Page};
use std::collections::HashSet;

/// Ordered, append-only collection of listings with unique ids
#[derive(Debug, Clone, Default)]
pub struct Collection {
    listings: Vec<Listing>,
    ids: HashSet<ListingId>,
}

impl Collection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Listings in insertion order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Number of listings
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Check if an id is present
    pub fn contains(&self, id: ListingId) -> bool {
        self.ids.contains(&id)
    }

    /// Remove every listing
    pub fn clear(&mut self) {
        self.listings.clear();
        self.ids.clear();
    }

    /// Merge a fetched page
    ///
    /// Unseen listings are appended in page order; a listing repeated within
    /// the page is kept once. A page that is empty, or that contributes no
    /// unseen listing, marks the end of data and leaves the collection as it
    /// was. `min_id` covers the whole page, seen or not.
    pub fn merge(&mut self, page: Page) -> MergeOutcome {
        let received = page.len();
        let min_id = page.min_id();

        let before = self.listings.len();
        for listing in page.listings {
            if self.ids.insert(listing.id) {
                self.listings.push(listing);
            }
        }
        let appended = self.listings.len() - before;

        MergeOutcome {
            received,
            appended,
            min_id,
            exhausted: appended == 0,
        }
    }
}
