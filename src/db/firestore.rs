// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore backend for the document store.
//!
//! Provides the generic operations the typed store layer is built on:
//! - point reads, collection scans and single-field equality queries
//! - upserts and create-only inserts
//! - transactional read-modify-write of one document
//! - transactional all-or-nothing creation of several documents

use crate::db::PendingDoc;
use crate::error::AppError;
use firestore::errors::FirestoreError;
use firestore::FirestoreConsistencySelector;
use futures_util::TryStreamExt;
use serde::{de::DeserializeOwned, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreBackend {
    client: firestore::FirestoreDb,
}

impl FirestoreBackend {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    pub async fn get<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn list<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.client
            .fluent()
            .select()
            .from(collection)
            .obj::<T>()
            .stream_query_with_errors()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .try_collect()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
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
        let field = field.to_string();
        let value = value.to_string();

        self.client
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.field(field.as_str()).eq(value.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a document.
    pub async fn set<T>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(value)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Create a document, failing if it already exists.
    pub async fn create<T>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let result: Result<(), FirestoreError> = self
            .client
            .fluent()
            .insert()
            .into(collection)
            .document_id(id)
            .object(value)
            .execute()
            .await;

        match result {
            Ok(()) => Ok(()),
            Err(FirestoreError::DataConflictError(_)) => {
                Err(AppError::AlreadyExists(format!("{}/{}", collection, id)))
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Read, transform and write back one document inside a transaction.
    ///
    /// Firestore locks the document once it is read in the transaction, so a
    /// concurrent `modify` of the same document sees this write before its
    /// own check runs.
    pub async fn modify<T, F>(&self, collection: &str, id: &str, f: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce(T) -> Result<T, AppError> + Send,
    {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let tx_db = self
            .client
            .clone_with_consistency_selector(FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ));

        let current: Option<T> = tx_db
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read in transaction: {}", e)))?;

        let Some(current) = current else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!("{}/{}", collection, id)));
        };

        let updated = match f(current) {
            Ok(updated) => updated,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(e);
            }
        };

        self.client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(&updated)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add write to transaction: {}", e)))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(updated)
    }

    /// Create every document or none of them.
    pub async fn create_all(&self, docs: &[PendingDoc]) -> Result<(), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let tx_db = self
            .client
            .clone_with_consistency_selector(FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ));

        for doc in docs {
            let existing = tx_db
                .fluent()
                .select()
                .by_id_in(doc.collection)
                .one(&doc.id)
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to read in transaction: {}", e))
                })?;

            if existing.is_some() {
                let _ = transaction.rollback().await;
                return Err(AppError::AlreadyExists(doc.path()));
            }
        }

        for doc in docs {
            self.client
                .fluent()
                .update()
                .in_col(doc.collection)
                .document_id(&doc.id)
                .object(&doc.value)
                .add_to_transaction(&mut transaction)
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to add {} to transaction: {}",
                        doc.path(),
                        e
                    ))
                })?;
        }

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        tracing::debug!(documents = docs.len(), "Multi-document create committed");

        Ok(())
    }
}
