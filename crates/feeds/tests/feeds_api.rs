//! End-to-end tests: the feeds router in front of a mock Shopify Admin API.
//!
//! Credentials are resolved from the environment per request, so each test
//! points a unique `store` suffix at its own mock server to stay independent
//! of test ordering.

// Tests mutate process env to exercise per-request credential resolution
#![allow(unsafe_code)]
#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopify_feeds::config::FeedsConfig;
use shopify_feeds::routes;
use shopify_feeds::state::AppState;

const GRAPHQL_PATH: &str = "/admin/api/2023-10/graphql.json";

fn set_env(key: &str, value: &str) {
    unsafe { std::env::set_var(key, value) };
}

fn app(disable_published_check: bool) -> axum::Router {
    let config = FeedsConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        api_version: "2023-10".to_string(),
        disable_published_check,
        sentry_dsn: None,
    };
    routes::routes().with_state(AppState::new(config))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn feed_page(nodes: Vec<Value>, end_cursor: Option<&str>) -> Value {
    json!({
        "data": {
            "results": {
                "edges": nodes.into_iter().map(|n| json!({"node": n})).collect::<Vec<_>>(),
                "pageInfo": {
                    "hasNextPage": end_cursor.is_some(),
                    "endCursor": end_cursor,
                },
            },
        },
    })
}

#[tokio::test]
async fn health_endpoint_is_live() {
    let (status, body) = get(app(false), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn products_feed_paginates_and_strips_filter_field() {
    let server = MockServer::start().await;

    // Page 1: one published product, hasNextPage with cursor "c1"
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page(
            vec![json!({"title": "Shirt", "handle": "shirt", "publishedOnCurrentPublication": true})],
            Some("c1"),
        )))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    // Page 2: requested with the cursor from page 1; includes an unpublished
    // product that must not reach the feed
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({"variables": {"cursor": "c1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page(
            vec![
                json!({"title": "Hat", "handle": "hat", "publishedOnCurrentPublication": true}),
                json!({"title": "Wholesale", "handle": "wholesale", "publishedOnCurrentPublication": false}),
            ],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    set_env("SHOPIFY_URL_e2eproducts", &server.uri());
    set_env("SHOPIFY_ADMIN_API_ACCESS_TOKEN_e2eproducts", "shpat_products");

    let (status, body) = get_json(app(false), "/feeds/products?store=e2eproducts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"title": "Shirt", "handle": "shirt"},
            {"title": "Hat", "handle": "hat"},
        ])
    );
}

#[tokio::test]
async fn variants_feed_applies_full_pipeline() {
    let server = MockServer::start().await;

    let variants = vec![
        // Dropped: no SKU
        json!({"title": "No Sku", "sku": "", "product": {
            "title": "Shirt", "handle": "shirt", "status": "ACTIVE",
            "publishedOnCurrentPublication": true,
        }}),
        // Dropped: product not published to this sales channel
        json!({"title": "Hidden", "sku": "H1", "product": {
            "title": "Wholesale", "handle": "wholesale", "status": "ACTIVE",
            "publishedOnCurrentPublication": false,
        }}),
        // Kept, then replaced by the later ACTIVE duplicate below
        json!({"title": "Old Red", "sku": "R1", "product": {
            "title": "Shirt", "handle": "shirt", "status": "DRAFT",
            "publishedOnCurrentPublication": true,
        }}),
        json!({"title": "Blue", "sku": "B1", "product": {
            "title": "Shirt", "handle": "shirt", "status": "ACTIVE",
            "publishedOnCurrentPublication": true,
        }}),
        json!({"title": "Red", "sku": "R1", "product": {
            "title": "Shirt", "handle": "shirt", "status": "ACTIVE",
            "publishedOnCurrentPublication": true,
        }}),
    ];

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page(variants, None)))
        .expect(1)
        .mount(&server)
        .await;

    set_env("SHOPIFY_URL_e2evariants", &server.uri());
    set_env("SHOPIFY_ADMIN_API_ACCESS_TOKEN_e2evariants", "shpat_variants");

    let (status, body) = get_json(app(false), "/feeds/variants?store=e2evariants").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {
                "title": "Red",
                "sku": "R1",
                "dashboardTitle": "Shirt - Red (R1)",
                "product": {"title": "Shirt", "handle": "shirt"},
            },
            {
                "title": "Blue",
                "sku": "B1",
                "dashboardTitle": "Shirt - Blue (B1)",
                "product": {"title": "Shirt", "handle": "shirt"},
            },
        ])
    );
}

#[tokio::test]
async fn variants_feed_honors_disabled_published_check() {
    let server = MockServer::start().await;

    let variants = vec![json!({"title": "Hidden", "sku": "H1", "product": {
        "title": "Wholesale", "handle": "wholesale", "status": "ACTIVE",
        "publishedOnCurrentPublication": false,
    }})];

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page(variants, None)))
        .expect(1)
        .mount(&server)
        .await;

    set_env("SHOPIFY_URL_e2eunpub", &server.uri());
    set_env("SHOPIFY_ADMIN_API_ACCESS_TOKEN_e2eunpub", "shpat_unpub");

    let (status, body) = get_json(app(true), "/feeds/variants?store=e2eunpub").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["sku"], json!("H1"));
}

#[tokio::test]
async fn collections_feed_is_a_passthrough() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_page(
            vec![json!({"title": "Summer", "handle": "summer"})],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    set_env("SHOPIFY_URL_e2ecollections", &server.uri());
    set_env("SHOPIFY_ADMIN_API_ACCESS_TOKEN_e2ecollections", "shpat_collections");

    let (status, body) = get_json(app(false), "/feeds/collections?store=e2ecollections").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"title": "Summer", "handle": "summer"}]));
}

#[tokio::test]
async fn missing_credentials_fail_before_any_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(0)
        .mount(&server)
        .await;

    // No SHOPIFY_URL_nocreds in the environment
    let (status, body) = get(app(false), "/feeds/products?store=nocreds").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        String::from_utf8(body)
            .unwrap()
            .contains("SHOPIFY_URL_nocreds")
    );

    server.verify().await;
}

#[tokio::test]
async fn upstream_failure_returns_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"errors": [{"message": "Throttled"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    set_env("SHOPIFY_URL_e2eerrors", &server.uri());
    set_env("SHOPIFY_ADMIN_API_ACCESS_TOKEN_e2eerrors", "shpat_errors");

    let (status, body) = get(app(false), "/feeds/collections?store=e2eerrors").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(String::from_utf8(body).unwrap().contains("Throttled"));
}
