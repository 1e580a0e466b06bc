// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (authentication, role gates, security headers).

pub mod access;
pub mod auth;
pub mod security;

pub use access::{enforce_gate, AccessGate, CurrentUser, GateState, RoleRequirement};
pub use auth::require_auth;
