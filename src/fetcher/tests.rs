//! Tests for the HTTP listing fetcher

use super::*;
use crate::types::ListingId;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> FeedConfig {
    FeedConfig::builder(format!("{}/xdeal/Xchange", server.uri()))
        .token("opaque-token")
        .client("Xpert", "2.2.6")
        .build()
}

#[test]
fn test_new_rejects_invalid_endpoint() {
    let result = HttpListingFetcher::new(&FeedConfig::new("not a url"));
    assert!(result.is_err());
}

#[test]
fn test_build_request_passes_filters_through() {
    let config = FeedConfig::builder("https://api.example.com/search")
        .token("tok")
        .client("Xpert", "1.0.0")
        .build();
    let fetcher = HttpListingFetcher::new(&config).unwrap();

    let filters = FilterParams::new()
        .category("phones")
        .search("pixel")
        .sort("newest")
        .price_range("10", "20");
    let cursor = PageToken::from("45");
    let request = fetcher.build_request(&cursor, &filters);

    assert_eq!(
        serde_json::to_value(request).unwrap(),
        json!({
            "categories": ["phones"],
            "last_listing_id": "45",
            "last_row_value": "",
            "max": "20",
            "min": "10",
            "search": "pixel",
            "sort": "newest",
            "token": "tok",
            "user_type": "Xpert",
            "version_number": "1.0.0"
        })
    );
}

#[test]
fn test_start_cursor_replaces_empty_cursor_only() {
    let config = FeedConfig::builder("https://api.example.com/search")
        .start_cursor("1017")
        .build();
    let fetcher = HttpListingFetcher::new(&config).unwrap();
    let filters = FilterParams::default();

    let start = PageToken::start();
    assert_eq!(fetcher.build_request(&start, &filters).last_listing_id, "1017");

    let cursor = PageToken::from("40");
    assert_eq!(fetcher.build_request(&cursor, &filters).last_listing_id, "40");
}

#[test]
fn test_blank_start_cursor_is_ignored() {
    let config = FeedConfig::builder("https://api.example.com/search")
        .start_cursor("  ")
        .build();
    let fetcher = HttpListingFetcher::new(&config).unwrap();

    let start = PageToken::start();
    let filters = FilterParams::default();
    assert_eq!(fetcher.build_request(&start, &filters).last_listing_id, "");
}

#[tokio::test]
async fn test_fetch_posts_request_and_decodes_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/xdeal/Xchange"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "categories": [],
            "last_listing_id": "",
            "last_row_value": "",
            "max": "",
            "min": "",
            "search": "",
            "sort": "",
            "token": "opaque-token",
            "user_type": "Xpert",
            "version_number": "2.2.6"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "xchange": [
                {"listing_id": 50, "model": "Phone", "brand": "Acme",
                 "currency": "USD", "selling_price": 10.5, "item_image": "a.jpg"},
                {"listing_id": 48}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpListingFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher
        .fetch(&PageToken::start(), &FilterParams::default())
        .await
        .unwrap();

    assert_eq!(page.ids(), vec![ListingId(50), ListingId(48)]);
    assert_eq!(page.listings[0].brand.as_deref(), Some("Acme"));
    assert_eq!(page.listings[0].image_url.as_deref(), Some("a.jpg"));
}

#[tokio::test]
async fn test_fetch_sends_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"last_listing_id": "45"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"xchange": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpListingFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher
        .fetch(&PageToken::from("45"), &FilterParams::default())
        .await
        .unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_missing_field_is_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock_server)
        .await;

    let fetcher = HttpListingFetcher::new(&config_for(&mock_server)).unwrap();
    let page = fetcher
        .fetch(&PageToken::start(), &FilterParams::default())
        .await
        .unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpListingFetcher::new(&config_for(&mock_server)).unwrap();
    let err = fetcher
        .fetch(&PageToken::start(), &FilterParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::server(Some(500), "HTTP 500: boom"));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"xchange\": ["))
        .mount(&mock_server)
        .await;

    let fetcher = HttpListingFetcher::new(&config_for(&mock_server)).unwrap();
    let err = fetcher
        .fetch(&PageToken::start(), &FilterParams::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Server { status: None, .. }));
}

#[tokio::test]
async fn test_fetch_unreachable_is_network_error() {
    let config = FeedConfig::new("http://127.0.0.1:1/search");
    let fetcher = HttpListingFetcher::new(&config).unwrap();

    let err = fetcher
        .fetch(&PageToken::start(), &FilterParams::default())
        .await
        .unwrap_err();

    assert!(err.is_network());
}
