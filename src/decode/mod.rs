//! Response decoding
//!
//! Turns a search response body into a [`Page`]. Decoding never fails: an
//! absent records field, a records field that is not an array, or a body
//! that is not an object all produce an empty page. Records that cannot be
//! read as a [`Listing`] are skipped individually.

use crate::types::{JsonValue, Listing, Page};
use tracing::warn;

/// Decoder that extracts listings from a field of the response body
#[derive(Debug, Clone)]
pub struct ListingDecoder {
    /// Dot path to the listings array (e.g. "xchange" or "data.items")
    records_path: String,
}

impl ListingDecoder {
    /// Create a decoder for the given records path
    pub fn new(records_path: impl Into<String>) -> Self {
        Self {
            records_path: records_path.into(),
        }
    }

    /// Get the records path
    pub fn records_path(&self) -> &str {
        &self.records_path
    }

    /// Decode a response body into a page
    pub fn decode(&self, body: &JsonValue) -> Page {
        let Some(records) = extract_path(body, &self.records_path) else {
            return Page::empty();
        };

        let JsonValue::Array(records) = records else {
            warn!(
                "Records field '{}' is not an array, treating as empty page",
                self.records_path
            );
            return Page::empty();
        };

        let mut listings = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            match serde_json::from_value::<Listing>(record.clone()) {
                Ok(listing) => listings.push(listing),
                Err(e) => warn!("Skipping record {index}: {e}"),
            }
        }

        Page::new(listings)
    }
}

impl Default for ListingDecoder {
    fn default() -> Self {
        Self::new("xchange")
    }
}

/// Walk a simple dot path ("a.b.c", optional "$." prefix) through objects
fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }

    Some(current)
}
