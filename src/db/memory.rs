// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store for local development and tests.
//!
//! Documents are kept as JSON values so records go through the same
//! serde round-trip they would against Firestore. A single lock covers
//! every collection, which makes `modify` and `create_all` atomic.

use crate::db::PendingDoc;
use crate::error::AppError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

type Collections = HashMap<String, BTreeMap<String, Value>>;

#[derive(Default)]
pub struct MemoryBackend {
    collections: Mutex<Collections>,
}

fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, AppError> {
    serde_json::from_value(value.clone())
        .map_err(|e| AppError::Database(format!("Failed to decode document: {}", e)))
}

fn encode<T: Serialize>(value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, AppError> {
        self.collections
            .lock()
            .map_err(|_| AppError::Database("Memory store lock poisoned".to_string()))
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError> {
        let collections = self.lock()?;
        collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(decode)
            .transpose()
    }

    pub fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, AppError> {
        let collections = self.lock()?;
        collections
            .get(collection)
            .map(|docs| docs.values().map(decode).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    pub fn find_by_field<T: DeserializeOwned>(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<T>, AppError> {
        let collections = self.lock()?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        docs.values()
            .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(decode)
            .collect()
    }

    pub fn set<T: Serialize>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError> {
        let value = encode(value)?;
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), value);
        Ok(())
    }

    pub fn create<T: Serialize>(&self, collection: &str, id: &str, value: &T) -> Result<(), AppError> {
        let value = encode(value)?;
        let mut collections = self.lock()?;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(AppError::AlreadyExists(format!("{}/{}", collection, id)));
        }
        docs.insert(id.to_string(), value);
        Ok(())
    }

    /// Read, transform and write back one document while holding the lock.
    pub fn modify<T, F>(&self, collection: &str, id: &str, f: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> Result<T, AppError>,
    {
        let mut collections = self.lock()?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, id)))?;

        let updated = f(decode(doc)?)?;
        *doc = encode(&updated)?;
        Ok(updated)
    }

    /// Create every document or none of them.
    pub fn create_all(&self, docs: &[PendingDoc]) -> Result<(), AppError> {
        let mut collections = self.lock()?;

        for doc in docs {
            let exists = collections
                .get(doc.collection)
                .is_some_and(|existing| existing.contains_key(&doc.id));
            if exists {
                return Err(AppError::AlreadyExists(doc.path()));
            }
        }

        for doc in docs {
            collections
                .entry(doc.collection.to_string())
                .or_default()
                .insert(doc.id.clone(), doc.value.clone());
        }
        Ok(())
    }
}
