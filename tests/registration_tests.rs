// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration endpoint tests.

use axum::http::{Method, StatusCode};
use creative_marketplace::db::collections;
use creative_marketplace::models::{Brand, Credential, User};
use creative_marketplace::AppState;
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, request};

fn registration(email: &str) -> serde_json::Value {
    json!({
        "name": "Grace Hopper",
        "email": email,
        "password": "cobol-rules",
        "companyName": "Compilers Inc",
        "companySize": "51-200"
    })
}

async fn document_counts(state: &AppState) -> (usize, usize, usize) {
    let users: Vec<User> = state.db.list(collections::USERS).await.unwrap();
    let brands: Vec<Brand> = state.db.list(collections::BRANDS).await.unwrap();
    let creds: Vec<Credential> = state.db.list(collections::IDENTITIES).await.unwrap();
    (users.len(), brands.len(), creds.len())
}

#[tokio::test]
async fn test_register_returns_created_user() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("grace@example.com")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "grace@example.com");
    assert_eq!(body["role"], "CLIENT");
    assert_eq!(body["isActive"], true);
    assert_eq!(body["companyName"], "Compilers Inc");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    assert_eq!(document_counts(&state).await, (1, 1, 1));
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let (app, _) = create_test_app();

    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("grace@example.com")),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "grace@example.com", "password": "cobol-rules"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["uid"], user_id);
}

#[tokio::test]
async fn test_duplicate_email_rejected_without_writes() {
    let (app, state) = create_test_app();

    let first = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("grace@example.com")),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let before = document_counts(&state).await;

    let second = app
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(registration("Grace@Example.com")),
        ))
        .await
        .unwrap();

    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(second).await["error"], "email_in_use");
    assert_eq!(document_counts(&state).await, before);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let (app, state) = create_test_app();

    let response = app
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "grace@example.com", "password": "cobol-rules"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");
    assert_eq!(document_counts(&state).await, (0, 0, 0));
}

#[tokio::test]
async fn test_null_field_rejected_as_bad_request() {
    let (app, state) = create_test_app();
    let mut body = registration("grace@example.com");
    body["companyName"] = serde_json::Value::Null;

    let response = app
        .oneshot(request(Method::POST, "/api/auth/register", None, Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert!(body["details"].is_string());
    assert_eq!(document_counts(&state).await, (0, 0, 0));
}

#[tokio::test]
async fn test_empty_body_rejected_as_bad_request() {
    let (app, state) = create_test_app();

    let response = app
        .clone()
        .oneshot(request(Method::POST, "/api/auth/register", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");

    let malformed = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(malformed).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "bad_request");

    assert_eq!(document_counts(&state).await, (0, 0, 0));
}
