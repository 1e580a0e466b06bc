// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use creative_marketplace::config::Config;
use creative_marketplace::db::DocumentStore;
use creative_marketplace::models::{Identity, Role};
use creative_marketplace::routes::create_router;
use creative_marketplace::services::resolve_user;
use creative_marketplace::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> DocumentStore {
    DocumentStore::firestore("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app over the in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(Config::default(), DocumentStore::in_memory()));
    (create_router(state.clone()), state)
}

/// A signed-in test account.
#[allow(dead_code)]
pub struct TestUser {
    pub identity: Identity,
    pub token: String,
}

impl TestUser {
    #[allow(dead_code)]
    pub fn id(&self) -> &str {
        &self.identity.uid
    }
}

/// Sign up `email`, give the resulting user `role`, and start a session.
#[allow(dead_code)]
pub async fn sign_in_as(state: &AppState, email: &str, role: Role) -> TestUser {
    let identity = state
        .identity
        .sign_up(email, "password123")
        .await
        .expect("sign up");

    let mut user = resolve_user(&state.db, &identity).await.expect("resolve");
    user.role = role;
    state.db.upsert_user(&user).await.expect("set role");

    let session = state.identity.start_session(identity.clone()).expect("session");
    TestUser {
        identity,
        token: session.token,
    }
}

/// Build a request with an optional Bearer token and JSON body.
#[allow(dead_code)]
pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
