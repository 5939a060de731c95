//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Signed session tokens

pub mod claims;
pub mod manager;
pub mod stats;

// Re-export commonly used types
pub use claims::SessionClaims;
pub use manager::SessionManager;
pub use stats::SessionStats;
