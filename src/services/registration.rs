// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client account registration.
//!
//! Creates the credential, the `User` and the client's `Brand` in one
//! all-or-nothing write.

use serde::Deserialize;
use validator::Validate;

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::identity::normalize_email;
use crate::models::{Brand, Credential, Role, User};
use crate::services::password::hash_password_blocking;
use crate::time_utils::now_rfc3339;

/// Registration form. Missing fields deserialize as empty and fail
/// validation, so they surface as 400 rather than a body rejection.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password is too short"))]
    pub password: String,
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 50, message = "Company size is required"))]
    pub company_size: String,
}

/// Register a new client account and return its user record.
pub async fn register_account(db: &DocumentStore, request: RegistrationRequest) -> Result<User> {
    let request = RegistrationRequest {
        name: request.name.trim().to_string(),
        email: normalize_email(&request.email),
        company_name: request.company_name.trim().to_string(),
        company_size: request.company_size.trim().to_string(),
        password: request.password,
    };
    request.validate()?;

    if db.get_credential(&request.email).await?.is_some()
        || db.find_user_by_email(&request.email).await?.is_some()
    {
        tracing::info!("Registration rejected: email already in use");
        return Err(AppError::DuplicateEmail);
    }

    let now = now_rfc3339();
    let uid = uuid::Uuid::new_v4().to_string();

    let credential = Credential {
        uid: uid.clone(),
        email: request.email.clone(),
        password_hash: hash_password_blocking(request.password).await?,
        created_at: now.clone(),
    };
    let user = User {
        id: uid.clone(),
        name: request.name,
        email: request.email,
        role: Role::Client,
        is_active: true,
        company_name: Some(request.company_name.clone()),
        company_size: Some(request.company_size.clone()),
        created_at: now.clone(),
        updated_at: now.clone(),
    };
    let brand = Brand {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: uid,
        company_name: request.company_name,
        company_size: request.company_size,
        created_at: now,
    };

    match db.create_account(&credential, &user, &brand).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration for the same email.
        Err(AppError::AlreadyExists(_)) => return Err(AppError::DuplicateEmail),
        Err(e) => return Err(e),
    }

    tracing::info!(user_id = %user.id, brand_id = %brand.id, "Account registered");
    Ok(user)
}
