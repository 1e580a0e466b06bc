// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod brand;
pub mod identity;
pub mod task;
pub mod user;

pub use brand::Brand;
pub use identity::{Credential, Identity};
pub use task::{Deliveries, Task, TaskEdit, TaskError, TaskStatus, TaskType};
pub use user::{Role, User};
