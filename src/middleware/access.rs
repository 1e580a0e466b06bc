// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role-based access gate.
//!
//! Runs after `require_auth`. Resolves the caller's `User` (creating a default
//! record on first sight), checks the effective role against the gate's
//! requirement, and either passes the request through with a `CurrentUser`
//! extension or denies it. The decision itself is the pure
//! [`AccessGate::decide`].

use crate::error::AppError;
use crate::models::{Identity, Role, User};
use crate::services::roles::{resolve_role_state, RoleState};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Roles a gate accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    Single(Role),
    AnyOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn any() -> Self {
        RoleRequirement::AnyOf(Role::ALL.to_vec())
    }

    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Single(required) => *required == role,
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
        }
    }

    pub fn roles(&self) -> Vec<Role> {
        match self {
            RoleRequirement::Single(role) => vec![*role],
            RoleRequirement::AnyOf(roles) => roles.clone(),
        }
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::Single(role)
    }
}

impl From<&[Role]> for RoleRequirement {
    fn from(roles: &[Role]) -> Self {
        RoleRequirement::AnyOf(roles.to_vec())
    }
}

/// What a gate does with a caller it rejects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyBehavior {
    /// 303 to the given URL
    Redirect(String),
    /// 403 with a [`DenialPanel`] body
    Panel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DenialPanel {
    pub error: String,
    pub message: String,
    pub required_roles: Vec<Role>,
    /// The caller's effective role, if any
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
    Deny(DenialPanel),
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    pub requirement: RoleRequirement,
    pub on_deny: DenyBehavior,
}

impl AccessGate {
    /// Gate that answers a rejected caller with a 403 panel.
    pub fn panel(requirement: impl Into<RoleRequirement>) -> Self {
        Self {
            requirement: requirement.into(),
            on_deny: DenyBehavior::Panel,
        }
    }

    /// Gate that sends a rejected caller to `target`.
    pub fn redirect(requirement: impl Into<RoleRequirement>, target: impl Into<String>) -> Self {
        Self {
            requirement: requirement.into(),
            on_deny: DenyBehavior::Redirect(target.into()),
        }
    }

    pub fn decide(&self, state: &RoleState) -> GateDecision {
        let role = state.effective_role();
        if role.is_some_and(|r| self.requirement.allows(r)) {
            return GateDecision::Allow;
        }

        match &self.on_deny {
            DenyBehavior::Redirect(target) => GateDecision::Redirect(target.clone()),
            DenyBehavior::Panel => GateDecision::Deny(DenialPanel {
                error: "forbidden".to_string(),
                message: denial_message(state),
                required_roles: self.requirement.roles(),
                role,
            }),
        }
    }
}

fn denial_message(state: &RoleState) -> String {
    match state {
        RoleState::Failed => "Unable to determine your role".to_string(),
        RoleState::Resolved(user) if !user.is_active => "Your account is inactive".to_string(),
        RoleState::Resolved(_) => "You do not have access to this page".to_string(),
    }
}

/// Middleware state: the app plus one gate configuration.
#[derive(Clone)]
pub struct GateState {
    pub app: Arc<AppState>,
    pub gate: Arc<AccessGate>,
}

impl GateState {
    pub fn new(app: &Arc<AppState>, gate: AccessGate) -> Self {
        Self {
            app: app.clone(),
            gate: Arc::new(gate),
        }
    }
}

/// The resolved user of a request that passed a gate.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware enforcing an [`AccessGate`]. Requires `Identity` in extensions.
pub async fn enforce_gate(
    State(gate_state): State<GateState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let role_state = resolve_role_state(&gate_state.app.db, &identity).await;

    match gate_state.gate.decide(&role_state) {
        GateDecision::Allow => {
            if let RoleState::Resolved(user) = role_state {
                request.extensions_mut().insert(CurrentUser(user));
            }
            Ok(next.run(request).await)
        }
        GateDecision::Redirect(target) => {
            tracing::info!(
                uid = %identity.uid,
                path = %request.uri().path(),
                "Access denied, redirecting"
            );
            Ok(Redirect::to(&target).into_response())
        }
        GateDecision::Deny(panel) => {
            tracing::info!(
                uid = %identity.uid,
                path = %request.uri().path(),
                role = ?panel.role,
                "Access denied"
            );
            Ok((StatusCode::FORBIDDEN, Json(panel)).into_response())
        }
    }
}
