//! Tests for the HTTP surface
//!
//! These drive the router directly and assert the response contract: the
//! Content-Type, Cache-Control and X-CACHE-STATUS headers on success, and the
//! status code and JSON payload on failure. The scraper is pointed at a mock
//! channel page; the cache is in-memory.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use telefeed::config::ScraperConfig;
use telefeed::server::{create_router, AppState};
use telefeed::{FeedService, MemoryCache, Scraper};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel_page() -> String {
    r#"<html><body>
    <div class="tgme_channel_info_header">
        <i class="tgme_page_photo_image"><img src="https://cdn.example.com/avatar.jpg"></i>
        <div class="tgme_channel_info_header_title"><span dir="auto">Example Channel</span></div>
    </div>
    <div class="tgme_widget_message" data-post="example/1">
        <div class="tgme_widget_message_text">Hello world.</div>
        <a class="tgme_widget_message_date"><time datetime="2025-03-01T10:00:00+00:00"></time></a>
    </div>
    </body></html>"#
        .to_string()
}

async fn mock_channel(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/s/example"))
        .respond_with(ResponseTemplate::new(200).set_body_string(channel_page()))
        .mount(server)
        .await;
}

fn app(server: &MockServer, cache: Arc<MemoryCache>) -> Router {
    let config = ScraperConfig {
        base_url: server.uri(),
        ..ScraperConfig::default()
    };

    let service = FeedService::new(
        Scraper::new(&config).unwrap(),
        cache as Arc<dyn telefeed::Cache>,
        Duration::from_secs(5),
    );

    create_router(AppState {
        service: Arc::new(service),
    })
}

async fn send(router: &Router, uri: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header: {}", name))
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn feed_response_headers_on_miss() {
    let server = MockServer::start().await;
    mock_channel(&server).await;
    let router = app(&server, Arc::new(MemoryCache::new()));

    let response = send(&router, "/telegram/channel/example").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type"),
        "application/rss+xml; charset=utf-8"
    );
    // Default TTL is 60 minutes.
    assert_eq!(header(&response, "cache-control"), "public, max-age=3600");
    assert_eq!(header(&response, "x-cache-status"), "MISS");
}

#[tokio::test]
async fn feed_response_reports_cache_hit() {
    let server = MockServer::start().await;
    mock_channel(&server).await;

    let cache = Arc::new(MemoryCache::new());
    let router = app(&server, Arc::clone(&cache));

    let response = send(&router, "/telegram/channel/example").await;
    assert_eq!(header(&response, "x-cache-status"), "MISS");

    // The write-through is detached; wait for it to land.
    for _ in 0..50 {
        if !cache.is_empty().await {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!cache.is_empty().await);

    let response = send(&router, "/telegram/channel/example").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "x-cache-status"), "HIT");
    assert_eq!(header(&response, "cache-control"), "public, max-age=3600");
}

#[tokio::test]
async fn zero_ttl_disables_response_caching() {
    let server = MockServer::start().await;
    mock_channel(&server).await;

    let cache = Arc::new(MemoryCache::new());
    let router = app(&server, Arc::clone(&cache));

    let response = send(&router, "/telegram/channel/example?cache_ttl=0").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-control"), "no-cache");
    assert_eq!(header(&response, "x-cache-status"), "MISS");

    let response = send(&router, "/telegram/channel/example?cache_ttl=0").await;
    assert_eq!(header(&response, "x-cache-status"), "MISS");
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn atom_format_sets_atom_content_type() {
    let server = MockServer::start().await;
    mock_channel(&server).await;
    let router = app(&server, Arc::new(MemoryCache::new()));

    let response = send(&router, "/telegram/channel/example?format=atom").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type"),
        "application/atom+xml; charset=utf-8"
    );
}

#[tokio::test]
async fn oversized_ttl_yields_clamped_max_age() {
    let server = MockServer::start().await;
    mock_channel(&server).await;
    let router = app(&server, Arc::new(MemoryCache::new()));

    let uri = "/telegram/channel/example?cache_ttl=18446744073709551615";
    let response = send(&router, uri).await;

    assert_eq!(response.status(), StatusCode::OK);
    let expected = format!(
        "public, max-age={}",
        telefeed::model::CACHE_TTL_MAX_MINUTES * 60
    );
    assert_eq!(header(&response, "cache-control"), expected);
}

#[tokio::test]
async fn invalid_format_is_bad_request() {
    let server = MockServer::start().await;
    mock_channel(&server).await;
    let router = app(&server, Arc::new(MemoryCache::new()));

    let response = send(&router, "/telegram/channel/example?format=json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(header(&response, "content-type"), "application/json");

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(payload["error"].as_str().unwrap().contains("format"));
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s/example"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let router = app(&server, Arc::new(MemoryCache::new()));
    let response = send(&router, "/telegram/channel/example").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(payload["error"].as_str().unwrap().contains("fetch"));
}
