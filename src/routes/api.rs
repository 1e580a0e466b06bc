// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for the signed-in user.

use crate::error::{AppError, Result};
use crate::middleware::access::{AccessGate, CurrentUser, RoleRequirement};
use crate::models::{Identity, User};
use crate::routes::gated;
use crate::services::dashboard::{summarize, DashboardSummary};
use crate::services::roles::resolve_user;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// Auth middleware is applied in routes/mod.rs; role gates here.
pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let dashboard_gate =
        AccessGate::redirect(RoleRequirement::any(), state.config.access_denied_url());

    Router::new()
        .route("/api/me", get(get_me))
        .route(
            "/api/dashboard",
            gated(state, dashboard_gate, get(get_dashboard)),
        )
}

/// The caller's user record, created on first sight. Returned even when the
/// account is inactive so the frontend can explain why.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<User>> {
    Ok(Json(resolve_user(&state.db, &identity).await?))
}

async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<DashboardSummary>> {
    let role = user
        .effective_role()
        .ok_or_else(|| AppError::Forbidden("Account is inactive".to_string()))?;
    Ok(Json(summarize(&state.db, &user, role).await?))
}
