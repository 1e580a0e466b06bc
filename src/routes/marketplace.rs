// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Marketplace browsing for designers.

use crate::error::Result;
use crate::middleware::access::{AccessGate, CurrentUser};
use crate::models::Role;
use crate::routes::gated;
use crate::services::MarketplaceView;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes(state: &Arc<AppState>) -> Router<Arc<AppState>> {
    let gate = AccessGate::panel(&[Role::Designer, Role::Admin][..]);
    Router::new().route("/api/marketplace", gated(state, gate, get(get_marketplace)))
}

#[derive(Debug, Default, Deserialize)]
pub struct MarketplaceQuery {
    #[serde(default)]
    pub search: Option<String>,
}

async fn get_marketplace(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<MarketplaceQuery>,
) -> Result<Json<MarketplaceView>> {
    let view = state
        .tasks
        .marketplace(&user, query.search.as_deref())
        .await?;
    tracing::debug!(viewer = %user.id, tasks = view.len(), "Marketplace view built");
    Ok(Json(view))
}
