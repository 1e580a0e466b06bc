// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, sign-in and sign-out routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::session_token;
use crate::models::User;
use crate::services::identity::{Session, SESSION_COOKIE};
use crate::services::registration::{register_account, RegistrationRequest};
use crate::AppState;

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

/// Routes that need a session. Auth is applied in routes/mod.rs.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/logout", post(logout))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub token: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub expires_at: usize,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Overwrites the session cookie whether or not the request carried one.
fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

fn with_session(jar: CookieJar, session: Session) -> (CookieJar, Json<SessionResponse>) {
    let jar = jar.add(session_cookie(session.token.clone()));
    (
        jar,
        Json(SessionResponse {
            uid: session.identity.uid,
            email: session.identity.email,
            token: session.token,
            expires_at: session.expires_at,
        }),
    )
}

/// Register a client account with its brand. Body rejections answer 400
/// with the usual error JSON.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>)> {
    let Json(request) = payload?;
    let user = register_account(&state.db, request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Create a credential only. The `User` record is created on first use.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<CredentialsRequest>,
) -> Result<(StatusCode, CookieJar, Json<SessionResponse>)> {
    let identity = state
        .identity
        .sign_up(&request.email, &request.password)
        .await?;
    let session = state.identity.start_session(identity)?;
    let (jar, body) = with_session(jar, session);
    Ok((StatusCode::CREATED, jar, body))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<CredentialsRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let session = state
        .identity
        .sign_in(&request.email, &request.password)
        .await?;
    Ok(with_session(jar, session))
}

/// Revoke the current session token and clear the cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<LogoutResponse>)> {
    let token = session_token(&jar, &headers).ok_or(AppError::Unauthorized)?;
    state.identity.sign_out(&token)?;

    Ok((
        jar.add(expired_session_cookie()),
        Json(LogoutResponse { success: true }),
    ))
}
