//! Common types used throughout the listing feed
//!
//! Listings, pages, pagination tokens and the filter set passed through to
//! the remote search endpoint.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Listing Identity
// ============================================================================

/// Unique, numerically ordered listing identifier
///
/// The remote service sends `listing_id` either as a JSON number or as a
/// numeric string; both decode to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

impl ListingId {
    /// Create a listing id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for ListingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl<'de> Deserialize<'de> for ListingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = ListingId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or a numeric string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<ListingId, E> {
                Ok(ListingId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<ListingId, E> {
                u64::try_from(v)
                    .map(ListingId)
                    .map_err(|_| E::custom(format!("negative listing id: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<ListingId, E> {
                v.parse()
                    .map_err(|_| E::custom(format!("non-numeric listing id: {v:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Accepts a price as a JSON number or a numeric string
fn deserialize_price<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error> {
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ============================================================================
// Listing
// ============================================================================

/// A single catalog entry
///
/// Field names follow the remote wire format; attributes other than `id` are
/// opaque to the pagination core and only carried for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier, used for deduplication and cursor derivation
    #[serde(rename = "listing_id")]
    pub id: ListingId,

    /// Display name
    #[serde(rename = "model", default)]
    pub display_name: Option<String>,

    /// Brand name
    #[serde(default)]
    pub brand: Option<String>,

    /// Currency code or symbol
    #[serde(default)]
    pub currency: Option<String>,

    /// Selling price
    #[serde(
        rename = "selling_price",
        default,
        deserialize_with = "deserialize_price"
    )]
    pub price: Option<f64>,

    /// Image URL
    #[serde(rename = "item_image", default)]
    pub image_url: Option<String>,

    /// Any other fields the service returned
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Listing {
    /// Create a listing with only an id
    pub fn new(id: impl Into<ListingId>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            brand: None,
            currency: None,
            price: None,
            image_url: None,
            extra: JsonObject::new(),
        }
    }

    /// Set the display name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set brand
    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Set currency and price
    #[must_use]
    pub fn with_price(mut self, currency: impl Into<String>, price: f64) -> Self {
        self.currency = Some(currency.into());
        self.price = Some(price);
        self
    }

    /// Price formatted with two decimals, or "N/A"
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("{price:.2}"),
            None => "N/A".to_string(),
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// The ordered result of one fetch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Listings in the order the service returned them
    pub listings: Vec<Listing>,
}

impl Page {
    /// Create a page from listings
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    /// Create an empty page
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of listings in the page
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Check if the page has no listings
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Smallest listing id in the page
    pub fn min_id(&self) -> Option<ListingId> {
        self.listings.iter().map(|l| l.id).min()
    }

    /// Ids in page order
    pub fn ids(&self) -> Vec<ListingId> {
        self.listings.iter().map(|l| l.id).collect()
    }
}

impl From<Vec<Listing>> for Page {
    fn from(listings: Vec<Listing>) -> Self {
        Self::new(listings)
    }
}

// ============================================================================
// Pagination Token
// ============================================================================

/// Opaque pagination cursor
///
/// Empty means "start from the beginning"; otherwise it holds the decimal
/// text of the smallest id of the most recent page. The service returns
/// listings with ids strictly below the cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    /// The empty start token
    pub fn start() -> Self {
        Self::default()
    }

    /// Token pointing below the given id
    pub fn from_id(id: ListingId) -> Self {
        Self(id.to_string())
    }

    /// Check if this is the start token
    pub fn is_start(&self) -> bool {
        self.0.is_empty()
    }

    /// Token text as sent on the wire
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageToken {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<String> for PageToken {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ============================================================================
// Filters
// ============================================================================

/// Filter constraints passed through verbatim to the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Category names
    pub categories: Vec<String>,
    /// Secondary sort cursor, passed through untouched
    pub last_row_value: String,
    /// Maximum price
    pub max: String,
    /// Minimum price
    pub min: String,
    /// Free-text search
    pub search: String,
    /// Sort key
    pub sort: String,
}

impl FilterParams {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Set the search text
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the sort key
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Set the price range
    #[must_use]
    pub fn price_range(mut self, min: impl Into<String>, max: impl Into<String>) -> Self {
        self.min = min.into();
        self.max = max.into();
        self
    }
}
