// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Task routes: create, view, edit, claim, deliver, review.

use crate::error::Result;
use crate::middleware::access::{AccessGate, CurrentUser, RoleRequirement};
use crate::models::task::ReviewDecision;
use crate::models::{Deliveries, Role, Task, TaskEdit};
use crate::routes::gated;
use crate::services::tasks::NewTask;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const OWNERS: [Role; 2] = [Role::Client, Role::Admin];
const DESIGNERS: [Role; 2] = [Role::Designer, Role::Admin];

pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let anyone = || AccessGate::panel(RoleRequirement::any());
    let owners = || AccessGate::panel(&OWNERS[..]);
    let designers = || AccessGate::panel(&DESIGNERS[..]);

    Router::new()
        .route("/api/tasks", gated(state, anyone(), get(list_tasks)))
        .route("/api/tasks", gated(state, owners(), post(create_task)))
        .route(
            "/api/tasks/completed",
            gated(state, owners(), get(completed_creatives)),
        )
        .route("/api/tasks/{id}", gated(state, anyone(), get(get_task)))
        .route("/api/tasks/{id}", gated(state, owners(), patch(edit_task)))
        .route(
            "/api/tasks/{id}/claim",
            gated(state, designers(), post(claim_task)),
        )
        .route(
            "/api/tasks/{id}/deliveries",
            gated(state, designers(), post(deliver_task)),
        )
        .route(
            "/api/tasks/{id}/review",
            gated(state, owners(), post(review_task)),
        )
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list_visible(&user).await?))
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(new_task): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>)> {
    let task = state.tasks.create(&user, new_task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn completed_creatives(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<Task>>> {
    Ok(Json(state.tasks.completed_creatives(&user).await?))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    Ok(Json(state.tasks.get(&user, &id).await?))
}

async fn edit_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(edit): Json<TaskEdit>,
) -> Result<Json<Task>> {
    Ok(Json(state.tasks.edit(&user, &id, edit).await?))
}

async fn claim_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Task>> {
    Ok(Json(state.tasks.claim(&user, &id).await?))
}

async fn deliver_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(delivery): Json<Deliveries>,
) -> Result<Json<Task>> {
    Ok(Json(state.tasks.deliver(&user, &id, delivery).await?))
}

async fn review_task(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<Task>> {
    Ok(Json(state.tasks.review(&user, &id, request.decision).await?))
}
