//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Role model definitions

use serde::{Deserialize, Serialize};

/// Role identifier
pub type RoleId = u64;

/// Role structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    /// Role ID
    pub id: RoleId,

    /// Role name, unique across the store
    pub name: String,

    /// Role description
    pub description: String,
}

impl Role {
    /// Create new role
    pub fn new(id: RoleId, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
