//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User model definitions

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User identifier
pub type UserId = u64;

/// User structure
#[derive(Clone, Serialize)]
pub struct User {
    /// User ID
    pub id: UserId,

    /// Email, unique across the store
    pub email: String,

    /// Password hash (PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether the user is active
    pub active: bool,

    /// When the account was confirmed
    pub confirmed_at: Option<DateTime<Utc>>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last login time
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create new user
    pub fn new(id: UserId, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password_hash,
            active: true,
            confirmed_at: None,
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    /// Whether the account has been confirmed
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_at.is_some()
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<sensitive>")
            .field("active", &self.active)
            .field("confirmed_at", &self.confirmed_at)
            .finish()
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.email)
    }
}
