//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User configuration

use serde::{Deserialize, Serialize};

/// User management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Password minimum length
    pub min_password_length: usize,

    /// Password complexity requirements
    pub password_complexity: PasswordComplexity,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            password_complexity: PasswordComplexity::default(),
        }
    }
}

/// Password complexity requirements
///
/// Nothing is required by default so the demo accounts can use plain
/// passwords.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordComplexity {
    /// Require uppercase letters
    pub require_uppercase: bool,

    /// Require lowercase letters
    pub require_lowercase: bool,

    /// Require numbers
    pub require_numbers: bool,

    /// Require special characters
    pub require_special: bool,
}
