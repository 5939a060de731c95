//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Roles and their assignment to users

pub mod manager;
pub mod model;
pub mod stats;

// Re-export commonly used types
pub use manager::RoleManager;
pub use model::{Role, RoleId};
pub use stats::RoleStats;
