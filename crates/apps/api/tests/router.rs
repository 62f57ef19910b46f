//! Router tests for requests that are answered before the database is touched.

use api::api_state::ApiContext;
use api::create_router;
use app_state::AppSettings;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tower::ServiceExt;

fn test_settings() -> AppSettings {
    serde_json::from_value(json!({
        "api": {
            "host": "127.0.0.1",
            "port": 0,
            "allowed_origins": [],
            "public_url": "http://localhost:8080",
            "rate_limiting": { "req_per_second": 1, "burst_size": 100 }
        },
        "database": {
            "max_connections": 1,
            "min_connections": 0,
            "max_lifetime": 60,
            "idle_timeout": 60,
            "acquire_timeout": 1
        },
        "secrets": {
            "jwt": "router-test-secret",
            "database_url": "postgres://nobody@127.0.0.1:1/none"
        },
        "auth": { "access_token_expiry_minutes": 5 },
        "uploads": {
            "image_folder": "/tmp/router-test/images",
            "cover_folder": "/tmp/router-test/covers",
            "max_upload_bytes": 1024
        },
        "seed": { "overpass_url": "http://127.0.0.1:1", "max_trips": 1 },
        "logging": { "level": "info" }
    }))
    .expect("valid settings")
}

fn app() -> Router {
    let settings = test_settings();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy(&settings.secrets.database_url)
        .expect("lazy pool");
    create_router(ApiContext::new(pool, settings)).expect("router")
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn profile_requires_a_token() {
    let (status, body) = send(get("/auth/profile")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_required");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (status, body) = send(get_with_auth("/auth/profile", "Bearer not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_required");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let (status, _) = send(get_with_auth("/trips/my-trips", "Basic dXNlcjpwYXNz")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn my_trips_requires_a_token() {
    let (status, _) = send(get("/trips/my-trips")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn optional_auth_still_rejects_an_invalid_token() {
    let (status, body) = send(get_with_auth("/trips", "Bearer tampered")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "authentication_required");
}

#[tokio::test]
async fn admin_routes_reject_anonymous_callers_first() {
    let request = Request::builder()
        .method("POST")
        .uri("/preferences")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Beach"}"#))
        .expect("request");
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_requires_a_token() {
    let request = Request::builder()
        .method("POST")
        .uri("/images/upload")
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn roles_lists_the_self_registrable_roles() {
    let (status, body) = send(get("/auth/roles")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let values: Vec<&str> = body["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|role| role["value"].as_str())
        .collect();
    assert_eq!(values, ["visitor", "trip_owner"]);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = send(get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/trips/{trip_id}"].is_object());
    assert!(body["components"]["securitySchemes"]["bearer_auth"].is_object());
}

#[tokio::test]
async fn health_reports_an_unreachable_database() {
    let (status, body) = send(get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "service_unavailable");
    assert!(body["message"].is_string());
}
