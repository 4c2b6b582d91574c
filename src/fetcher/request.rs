//! Search request body

use serde::Serialize;

/// JSON body posted to the search endpoint
///
/// Borrowed from the fetcher and the caller's filters; every field is
/// passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchRequest<'a> {
    pub categories: &'a [String],
    pub last_listing_id: &'a str,
    pub last_row_value: &'a str,
    pub max: &'a str,
    pub min: &'a str,
    pub search: &'a str,
    pub sort: &'a str,
    pub token: &'a str,
    pub user_type: &'a str,
    pub version_number: &'a str,
}
