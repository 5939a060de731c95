//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Role store counters

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters kept by the role store
///
/// They survive `drop_all`, so a reseeded store reports its whole history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleStats {
    pub roles_created: u64,

    /// Roles appended to a user's list
    pub role_assignments: u64,

    /// Assignments refused by the per-user role limit
    pub rejected_assignments: u64,

    pub role_removals: u64,

    /// Times the store was emptied
    pub resets: u64,

    /// When roles or assignments last changed
    pub last_change: Option<DateTime<Utc>>,
}

impl RoleStats {
    pub fn record_created(&mut self) {
        self.roles_created += 1;
        self.touch();
    }

    pub fn record_assignment(&mut self) {
        self.role_assignments += 1;
        self.touch();
    }

    pub fn record_rejected_assignment(&mut self) {
        self.rejected_assignments += 1;
    }

    pub fn record_removal(&mut self) {
        self.role_removals += 1;
        self.touch();
    }

    pub fn record_reset(&mut self) {
        self.resets += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.last_change = Some(Utc::now());
    }
}
