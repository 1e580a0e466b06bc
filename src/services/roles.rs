// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Role resolution: map an authenticated identity to its `User` record.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{Identity, Role, User};
use crate::time_utils::now_rfc3339;

/// Outcome of resolving the acting user's role.
#[derive(Debug, Clone)]
pub enum RoleState {
    Resolved(User),
    /// Resolution failed; treated as having no role.
    Failed,
}

impl RoleState {
    pub fn effective_role(&self) -> Option<Role> {
        match self {
            RoleState::Resolved(user) => user.effective_role(),
            RoleState::Failed => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            RoleState::Resolved(user) => Some(user),
            RoleState::Failed => None,
        }
    }
}

/// Find the `User` for an identity, creating a default CLIENT record on
/// first sight.
///
/// Lookup is by subject ID, then by email. A lost creation race falls back
/// to whatever record won, so each subject ends up with exactly one record.
pub async fn resolve_user(db: &DocumentStore, identity: &Identity) -> Result<User> {
    if let Some(user) = db.get_user(&identity.uid).await? {
        return Ok(user);
    }

    if let Some(user) = db.find_user_by_email(&identity.email).await? {
        tracing::debug!(
            uid = %identity.uid,
            user_id = %user.id,
            "Resolved user by email"
        );
        return Ok(user);
    }

    let user = User::default_for(identity, &now_rfc3339());
    match db.create_user(&user).await {
        Ok(()) => {
            tracing::info!(uid = %identity.uid, role = %user.role, "Created default user record");
            Ok(user)
        }
        Err(AppError::AlreadyExists(_)) => db.get_user(&identity.uid).await?.ok_or_else(|| {
            AppError::Database(format!("User {} vanished after create conflict", identity.uid))
        }),
        Err(e) => Err(e),
    }
}

/// Resolve without propagating errors; a failure means "no role".
pub async fn resolve_role_state(db: &DocumentStore, identity: &Identity) -> RoleState {
    match resolve_user(db, identity).await {
        Ok(user) => RoleState::Resolved(user),
        Err(e) => {
            tracing::warn!(uid = %identity.uid, error = %e, "Role resolution failed");
            RoleState::Failed
        }
    }
}
