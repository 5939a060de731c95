//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Session statistics

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Session statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    /// Number of sessions issued
    pub sessions_issued: u64,

    /// Number of sessions validated
    pub sessions_validated: u64,

    /// Number of sessions revoked
    pub sessions_revoked: u64,

    /// Number of validation failures
    pub validation_failures: u64,

    /// Last session issued
    pub last_session_issued: Option<DateTime<Utc>>,
}

impl SessionStats {
    /// Create new session statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment sessions issued count
    pub fn increment_sessions_issued(&mut self) {
        self.sessions_issued += 1;
        self.last_session_issued = Some(Utc::now());
    }

    /// Increment sessions validated count
    pub fn increment_sessions_validated(&mut self) {
        self.sessions_validated += 1;
    }

    /// Increment sessions revoked count
    pub fn increment_sessions_revoked(&mut self) {
        self.sessions_revoked += 1;
    }

    /// Increment validation failures count
    pub fn increment_validation_failures(&mut self) {
        self.validation_failures += 1;
    }
}
