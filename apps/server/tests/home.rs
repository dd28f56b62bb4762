mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{get, router_with, StubHistory, StubProvider};
use serde_json::json;

fn app() -> axum::Router {
    router_with(Arc::new(StubProvider::new(None, StubHistory::NotFound)))
}

#[tokio::test]
async fn home_lists_endpoints() {
    let (status, body) = get(app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to the Financial Data API");
    let endpoints = body["endpoints"].as_object().unwrap();
    assert_eq!(endpoints.len(), 3);
    assert!(endpoints.contains_key("/api/company_info/<symbol>"));
    assert!(endpoints.contains_key("/api/realstock/<symbol>"));
    assert!(endpoints.contains_key("/api/historical_data"));
}

#[tokio::test]
async fn healthz_works() {
    let (status, body) = get(app(), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let (status, body) = get(app(), "/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/company_info/{symbol}"));
    assert!(paths.contains_key("/api/realstock/{symbol}"));
    assert!(paths.contains_key("/api/historical_data"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = get(app(), "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
