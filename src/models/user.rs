// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::Identity;

/// Application role, gating feature visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Client,
    Designer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Client, Role::Designer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Designer => "DESIGNER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Identity subject ID (also used as document ID)
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Deactivated users keep their record but lose every role check
    pub is_active: bool,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Default record for an identity that has never been seen before.
    pub fn default_for(identity: &Identity, now: &str) -> Self {
        Self {
            id: identity.uid.clone(),
            name: default_display_name(&identity.email),
            email: identity.email.clone(),
            role: Role::Client,
            is_active: true,
            company_name: None,
            company_size: None,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// The role this user is acting with, if any.
    ///
    /// Inactive users have no role, whatever is stored.
    pub fn effective_role(&self) -> Option<Role> {
        self.is_active.then_some(self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.effective_role() == Some(Role::Admin)
    }
}

/// Local part of an email address, used until the user sets a name.
fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
