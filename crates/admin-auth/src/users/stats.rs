//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

/// User statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserStats {
    /// Number of users created
    pub users_created: u64,

    /// Number of password verifications
    pub password_verifications: u64,

    /// Number of failed password verifications
    pub failed_verifications: u64,

    /// Number of users confirmed
    pub users_confirmed: u64,

    /// Last user created
    pub last_user_created: Option<DateTime<Utc>>,

    /// Last password verification
    pub last_password_verification: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Create new user statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment users created count
    pub fn increment_users_created(&mut self) {
        self.users_created += 1;
        self.last_user_created = Some(Utc::now());
    }

    /// Record a password verification
    pub fn record_password_verification(&mut self, success: bool) {
        self.password_verifications += 1;
        if !success {
            self.failed_verifications += 1;
        }
        self.last_password_verification = Some(Utc::now());
    }

    /// Increment users confirmed count
    pub fn increment_users_confirmed(&mut self) {
        self.users_confirmed += 1;
    }
}
