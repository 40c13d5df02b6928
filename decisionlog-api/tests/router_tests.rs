//! Router tests that need no database
//!
//! Every request here is answered by the auth gate, the extractors or
//! request validation before a query would run.

mod common;

use axum::http::{Method, StatusCode};
use common::{lazy_app, send, TEST_SECRET};
use decisionlog_shared::auth::jwt;
use serde_json::json;
use uuid::Uuid;

fn token_pair() -> jwt::TokenPair {
    jwt::issue_token_pair(Uuid::new_v4(), TEST_SECRET).unwrap()
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = lazy_app();

    for (method, uri) in [
        (Method::GET, "/decisions"),
        (Method::GET, "/tags"),
        (Method::POST, "/votes"),
        (Method::GET, "/teams"),
        (Method::GET, "/auth/me"),
        (Method::POST, "/bot/query"),
    ] {
        let (status, body) = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_garbage_and_refresh_tokens_are_rejected() {
    let app = lazy_app();

    let (status, _) = send(&app, Method::GET, "/decisions", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Refresh tokens only work at /auth/refresh
    let pair = token_pair();
    let (status, _) = send(&app, Method::GET, "/decisions", Some(&pair.refresh_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = send(&lazy_app(), Method::GET, "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_issues_access_token() {
    let pair = token_pair();

    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": pair.refresh_token })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    let access = body["access_token"].as_str().unwrap();
    assert!(jwt::validate_access_token(access, TEST_SECRET).is_ok());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let pair = token_pair();

    let (status, _) = send(
        &lazy_app(),
        Method::POST,
        "/auth/refresh",
        None,
        Some(json!({ "refresh_token": pair.access_token })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "short" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_register_rejects_overlong_email() {
    let label = "b".repeat(60);
    let email = format!("{}@{}.{}.{}.{}.com", "a".repeat(64), label, label, label, label);
    assert!(email.len() > 255);

    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "decide2024" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_register_requires_letter_and_digit() {
    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "a@example.com", "password": "onlyletters" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = lazy_app();
    let token = token_pair().access_token;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/decisions")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"title\": "))
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_enum_values_are_bad_request() {
    let app = lazy_app();
    let token = token_pair().access_token;

    let (status, _) = send(
        &app,
        Method::POST,
        "/decisions",
        Some(&token),
        Some(json!({ "title": "Adopt library X", "status": "closed" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/votes",
        Some(&token),
        Some(json!({ "decision_id": Uuid::new_v4(), "vote": "maybe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid vote type: maybe");
}

#[tokio::test]
async fn test_confidence_out_of_range() {
    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/decisions",
        Some(&token_pair().access_token),
        Some(json!({ "title": "Adopt library X", "confidence_level": 9 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "confidence_level");
}

#[tokio::test]
async fn test_non_uuid_path_is_bad_request() {
    let (status, body) = send(
        &lazy_app(),
        Method::GET,
        "/decisions/not-a-uuid",
        Some(&token_pair().access_token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_whiteboard_data_must_be_json() {
    let (status, _) = send(
        &lazy_app(),
        Method::POST,
        "/whiteboards",
        Some(&token_pair().access_token),
        Some(json!({ "name": "Sketch", "data": "[{" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_whiteboard_name_must_not_be_blank() {
    let (status, body) = send(
        &lazy_app(),
        Method::POST,
        "/whiteboards",
        Some(&token_pair().access_token),
        Some(json!({ "name": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "name");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = lazy_app();
    let request = axum::http::Request::builder()
        .uri("/decisions")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
