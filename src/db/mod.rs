// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: a document store with Firestore and in-memory backends.

pub mod firestore;
pub mod memory;
pub mod store;

pub use self::firestore::FirestoreBackend;
pub use memory::MemoryBackend;
pub use store::DocumentStore;

use crate::error::AppError;
use serde::Serialize;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TASKS: &str = "tasks";
    pub const BRANDS: &str = "brands";
    /// Sign-in credentials (keyed by normalized, URL-encoded email)
    pub const IDENTITIES: &str = "identities";
}

/// A document queued for an all-or-nothing multi-document create.
#[derive(Debug, Clone)]
pub struct PendingDoc {
    pub collection: &'static str,
    pub id: String,
    pub value: serde_json::Value,
}

impl PendingDoc {
    pub fn new<T: Serialize>(
        collection: &'static str,
        id: impl Into<String>,
        value: &T,
    ) -> Result<Self, AppError> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))?;
        Ok(Self {
            collection,
            id: id.into(),
            value,
        })
    }

    /// `collection/id`, for error messages.
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.id)
    }
}
