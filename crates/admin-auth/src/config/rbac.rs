//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Role-based access control configuration

use serde::{Deserialize, Serialize};

/// Role-based access control configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RbacConfig {
    /// Name of the role that opens the admin panel
    pub admin_role: String,

    /// Maximum roles per user
    pub max_roles_per_user: usize,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            admin_role: crate::DEFAULT_ADMIN_ROLE.to_string(),
            max_roles_per_user: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rbac_config_default() {
        let config = RbacConfig::default();
        assert_eq!(config.admin_role, "admin");
        assert_eq!(config.max_roles_per_user, 5);
    }
}
