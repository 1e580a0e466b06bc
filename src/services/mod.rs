// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod dashboard;
pub mod identity;
pub mod marketplace;
pub mod password;
pub mod registration;
pub mod roles;
pub mod tasks;

pub use identity::{AuthStateChange, IdentityProvider, Session, Subscription};
pub use marketplace::MarketplaceView;
pub use roles::{resolve_role_state, resolve_user, RoleState};
pub use tasks::TaskService;
