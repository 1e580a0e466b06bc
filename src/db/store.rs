// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store with typed operations.
//!
//! Provides high-level operations for:
//! - Users (application profile and role)
//! - Tasks (creative work requests)
//! - Brands (client companies)
//! - Credentials (sign-in records keyed by email)

use crate::config::{Config, StoreBackend};
use crate::db::{collections, FirestoreBackend, MemoryBackend, PendingDoc};
use crate::error::AppError;
use crate::models::identity::normalize_email;
use crate::models::{Brand, Credential, Task, User};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Firestore(FirestoreBackend),
    Memory(Arc<MemoryBackend>),
}

/// Handle to the document store. Cheap to clone.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Backend,
}

/// Document ID of the credential for an email address.
pub fn credential_key(email: &str) -> String {
    urlencoding::encode(&normalize_email(email)).into_owned()
}

impl DocumentStore {
    /// Connect to the backend selected in configuration.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Firestore => Self::firestore(&config.gcp_project_id).await,
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store; data is lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub async fn firestore(project_id: &str) -> Result<Self, AppError> {
        Ok(Self {
            backend: Backend::Firestore(FirestoreBackend::new(project_id).await?),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryBackend::new())),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            Backend::Firestore(_) => "firestore",
            Backend::Memory(_) => "memory",
        }
    }

    // ─── Generic Operations ──────────────────────────────────────

    pub async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.get(collection, id).await,
            Backend::Memory(db) => db.get(collection, id),
        }
    }

    pub async fn list<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.list(collection).await,
            Backend::Memory(db) => db.list(collection),
        }
    }

    pub async fn find_by_field<T>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.find_by_field(collection, field, value).await,
            Backend::Memory(db) => db.find_by_field(collection, field, value),
        }
    }

    pub async fn set<T>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.set(collection, id, value).await,
            Backend::Memory(db) => db.set(collection, id, value),
        }
    }

    /// Create-only write; `AppError::AlreadyExists` if the document exists.
    pub async fn create<T>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.create(collection, id, value).await,
            Backend::Memory(db) => db.create(collection, id, value),
        }
    }

    /// Atomic read-modify-write. `f` sees the current document and either
    /// returns the replacement or an error that aborts the write.
    pub async fn modify<T, F>(&self, collection: &str, id: &str, f: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(T) -> Result<T, AppError> + Send,
    {
        match &self.backend {
            Backend::Firestore(db) => db.modify(collection, id, f).await,
            Backend::Memory(db) => db.modify(collection, id, f),
        }
    }

    /// Create all documents atomically; nothing is written if any exists.
    pub async fn create_all(&self, docs: &[PendingDoc]) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(db) => db.create_all(docs).await,
            Backend::Memory(db) => db.create_all(docs),
        }
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        self.get(collections::USERS, id).await
    }

    /// First user whose stored email matches (case-insensitive).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .find_by_field(collections::USERS, "email", &normalize_email(email))
            .await?;
        Ok(users.into_iter().next())
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        self.create(collections::USERS, &user.id, user).await
    }

    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set(collections::USERS, &user.id, user).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.list(collections::USERS).await
    }

    pub async fn update_user<F>(&self, id: &str, f: F) -> Result<User, AppError>
    where
        F: FnOnce(User) -> Result<User, AppError> + Send,
    {
        self.modify(collections::USERS, id, f).await
    }

    // ─── Task Operations ─────────────────────────────────────────

    pub async fn get_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        self.get(collections::TASKS, id).await
    }

    /// Every task in the store. Callers filter in memory.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        self.list(collections::TASKS).await
    }

    pub async fn list_tasks_for_client(&self, client_id: &str) -> Result<Vec<Task>, AppError> {
        self.find_by_field(collections::TASKS, "clientId", client_id)
            .await
    }

    pub async fn create_task(&self, task: &Task) -> Result<(), AppError> {
        self.create(collections::TASKS, &task.id, task).await
    }

    pub async fn update_task<F>(&self, id: &str, f: F) -> Result<Task, AppError>
    where
        F: FnOnce(Task) -> Result<Task, AppError> + Send,
    {
        self.modify(collections::TASKS, id, f).await
    }

    // ─── Brand Operations ────────────────────────────────────────

    pub async fn get_brand(&self, id: &str) -> Result<Option<Brand>, AppError> {
        self.get(collections::BRANDS, id).await
    }

    pub async fn list_brands_for_owner(&self, owner_id: &str) -> Result<Vec<Brand>, AppError> {
        self.find_by_field(collections::BRANDS, "ownerId", owner_id)
            .await
    }

    // ─── Credential Operations ───────────────────────────────────

    pub async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.get(collections::IDENTITIES, &credential_key(email))
            .await
    }

    pub async fn create_credential(&self, credential: &Credential) -> Result<(), AppError> {
        self.create(
            collections::IDENTITIES,
            &credential_key(&credential.email),
            credential,
        )
        .await
    }

    // ─── Account Registration ────────────────────────────────────

    /// Atomically create the credential, user and brand for a new account.
    ///
    /// Fails with `AppError::AlreadyExists` (and writes nothing) if any of
    /// the three documents exists, which includes a taken email address.
    pub async fn create_account(
        &self,
        credential: &Credential,
        user: &User,
        brand: &Brand,
    ) -> Result<(), AppError> {
        let docs = [
            PendingDoc::new(
                collections::IDENTITIES,
                credential_key(&credential.email),
                credential,
            )?,
            PendingDoc::new(collections::USERS, user.id.clone(), user)?,
            PendingDoc::new(collections::BRANDS, brand.id.clone(), brand)?,
        ];
        self.create_all(&docs).await
    }
}
