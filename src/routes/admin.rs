// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Administration routes: user roles and task oversight.

use crate::error::{AppError, Result};
use crate::middleware::access::{AccessGate, CurrentUser};
use crate::models::{Role, Task, User};
use crate::routes::gated;
use crate::services::tasks::AdminTaskUpdate;
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let admin = || AccessGate::panel(Role::Admin);

    Router::new()
        .route("/api/admin/users", gated(state, admin(), get(list_users)))
        .route(
            "/api/admin/users/{id}",
            gated(state, admin(), patch(update_user)),
        )
        .route(
            "/api/admin/tasks/{id}",
            gated(state, admin(), patch(update_task)),
        )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>> {
    let mut users = state.db.list_users().await?;
    users.sort_by(|a, b| a.email.cmp(&b.email));
    Ok(Json(users))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<UserUpdate>,
) -> Result<Json<User>> {
    // An admin locking themselves out leaves nobody to undo it.
    let demotes = update.role.is_some_and(|r| r != Role::Admin);
    if id == admin.id && (update.is_active == Some(false) || demotes) {
        return Err(AppError::BadRequest(
            "Admins cannot demote or deactivate themselves".to_string(),
        ));
    }

    let now = now_rfc3339();
    let user = state
        .db
        .update_user(&id, move |mut user| {
            if let Some(role) = update.role {
                user.role = role;
            }
            if let Some(active) = update.is_active {
                user.is_active = active;
            }
            user.updated_at = now;
            Ok(user)
        })
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound(format!("User {} not found", id)),
            other => other,
        })?;

    tracing::info!(
        admin_id = %admin.id,
        user_id = %user.id,
        role = %user.role,
        is_active = user.is_active,
        "User updated by admin"
    );
    Ok(Json(user))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(update): Json<AdminTaskUpdate>,
) -> Result<Json<Task>> {
    let task = state.tasks.admin_update(&id, update).await?;
    tracing::info!(
        admin_id = %admin.id,
        task_id = %task.id,
        status = %task.status.label(),
        pushed = task.pushed_to_marketplace,
        "Task updated by admin"
    );
    Ok(Json(task))
}
