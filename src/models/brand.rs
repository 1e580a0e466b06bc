// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client brand created alongside the account at registration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    /// Owning user ID
    pub owner_id: String,
    pub company_name: String,
    pub company_size: String,
    pub created_at: String,
}
