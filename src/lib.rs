// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Creative marketplace: clients post design tasks, designers claim and
//! deliver them, admins oversee users and tasks.
//!
//! This crate provides the backend API: identity and sessions, role-gated
//! routes, the task lifecycle and the marketplace view.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{IdentityProvider, TaskService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: DocumentStore,
    pub identity: IdentityProvider,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(config: Config, db: DocumentStore) -> Self {
        Self {
            identity: IdentityProvider::new(&config, db.clone()),
            tasks: TaskService::new(db.clone()),
            config,
            db,
        }
    }
}
