// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication identities and stored credentials.

use serde::{Deserialize, Serialize};

/// An authenticated identity, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject ID; matches the `User` document ID
    pub uid: String,
    pub email: String,
}

/// Stored sign-in credential.
///
/// Keyed by the normalized email so the store itself rejects duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub uid: String,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: String,
}

impl Credential {
    pub fn identity(&self) -> Identity {
        Identity {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }
}

/// Canonical form of an email address for lookups and keys.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
