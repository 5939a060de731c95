//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Role management functionality

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::RbacConfig;
use crate::users::UserId;

use super::model::{Role, RoleId};
use super::stats::RoleStats;

/// Role manager
///
/// Holds the roles table and the `roles_users` join relation. Assignments
/// keep insertion order, which is the order actors see their roles in.
#[derive(Debug)]
pub struct RoleManager {
    /// RBAC configuration
    config: RbacConfig,

    /// Roles storage
    roles: Arc<RwLock<BTreeMap<RoleId, Role>>>,

    /// Role name to role ID mapping
    name_to_id: Arc<RwLock<HashMap<String, RoleId>>>,

    /// User role assignments
    user_roles: Arc<RwLock<HashMap<UserId, Vec<RoleId>>>>,

    /// Next role ID
    next_id: AtomicU64,

    /// Statistics
    stats: Arc<RwLock<RoleStats>>,
}

impl RoleManager {
    /// Create new role manager
    pub async fn new(config: RbacConfig) -> crate::AuthResult<Self> {
        Ok(Self {
            config,
            roles: Arc::new(RwLock::new(BTreeMap::new())),
            name_to_id: Arc::new(RwLock::new(HashMap::new())),
            user_roles: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            stats: Arc::new(RwLock::new(RoleStats::default())),
        })
    }

    /// Create new role
    pub async fn create_role(&self, name: String, description: String) -> crate::AuthResult<Role> {
        if name.trim().is_empty() {
            return Err(crate::AuthError::validation(
                "Role name cannot be empty".to_string(),
            ));
        }

        // Holding the name map across the insert keeps names unique
        let mut name_map = self.name_to_id.write().await;
        if name_map.contains_key(&name) {
            return Err(crate::AuthError::conflict(format!(
                "Role '{}' already exists",
                name
            )));
        }

        let role = Role::new(self.next_id.fetch_add(1, Ordering::SeqCst), name, description);

        {
            let mut roles = self.roles.write().await;
            roles.insert(role.id, role.clone());
        }
        name_map.insert(role.name.clone(), role.id);
        drop(name_map);

        {
            let mut stats = self.stats.write().await;
            stats.record_created();
        }

        info!("Created role: {}", role.name);
        Ok(role)
    }

    /// Find role by exact name
    pub async fn find_role_by_name(&self, name: &str) -> Option<Role> {
        let role_id = {
            let name_map = self.name_to_id.read().await;
            name_map.get(name).copied()
        };

        match role_id {
            Some(role_id) => self.get_role_by_id(role_id).await,
            None => None,
        }
    }

    /// Get role by ID
    pub async fn get_role_by_id(&self, role_id: RoleId) -> Option<Role> {
        let roles = self.roles.read().await;
        roles.get(&role_id).cloned()
    }

    /// List all roles ordered by ID
    pub async fn list_roles(&self) -> Vec<Role> {
        let roles = self.roles.read().await;
        roles.values().cloned().collect()
    }

    /// Get user roles in assignment order
    pub async fn get_user_roles(&self, user_id: UserId) -> Vec<Role> {
        let role_ids = {
            let user_roles = self.user_roles.read().await;
            user_roles.get(&user_id).cloned().unwrap_or_default()
        };

        let roles = self.roles.read().await;
        role_ids
            .iter()
            .filter_map(|id| roles.get(id).cloned())
            .collect()
    }

    /// Users holding a role
    pub async fn users_with_role(&self, role_id: RoleId) -> Vec<UserId> {
        let user_roles = self.user_roles.read().await;
        let mut users: Vec<UserId> = user_roles
            .iter()
            .filter(|(_, roles)| roles.contains(&role_id))
            .map(|(user_id, _)| *user_id)
            .collect();
        users.sort_unstable();
        users
    }

    /// Assign role to user
    ///
    /// The role is appended after the user's existing roles. Assigning a role
    /// the user already holds is a no-op.
    pub async fn assign_role_to_user(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> crate::AuthResult<()> {
        {
            let roles = self.roles.read().await;
            if !roles.contains_key(&role_id) {
                return Err(crate::AuthError::not_found(format!(
                    "Role {} not found",
                    role_id
                )));
            }
        }

        let at_limit = {
            let mut user_roles = self.user_roles.write().await;
            let assigned = user_roles.entry(user_id).or_default();
            if assigned.contains(&role_id) {
                debug!("User {} already holds role {}", user_id, role_id);
                return Ok(());
            }
            let at_limit = assigned.len() >= self.config.max_roles_per_user;
            if !at_limit {
                assigned.push(role_id);
            }
            at_limit
        };

        {
            let mut stats = self.stats.write().await;
            if at_limit {
                stats.record_rejected_assignment();
            } else {
                stats.record_assignment();
            }
        }

        if at_limit {
            return Err(crate::AuthError::validation(format!(
                "User has reached maximum roles limit ({})",
                self.config.max_roles_per_user
            )));
        }

        info!("Assigned role {} to user {}", role_id, user_id);
        Ok(())
    }

    /// Remove role from user
    pub async fn remove_role_from_user(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> crate::AuthResult<()> {
        let removed = {
            let mut user_roles = self.user_roles.write().await;
            match user_roles.get_mut(&user_id) {
                Some(roles) => {
                    let before = roles.len();
                    roles.retain(|r| *r != role_id);
                    before != roles.len()
                }
                None => false,
            }
        };

        if removed {
            let mut stats = self.stats.write().await;
            stats.record_removal();
            info!("Removed role {} from user {}", role_id, user_id);
        }

        Ok(())
    }

    /// Drop every role and assignment
    pub async fn drop_all(&self) {
        let mut name_map = self.name_to_id.write().await;
        let mut roles = self.roles.write().await;
        let mut user_roles = self.user_roles.write().await;

        name_map.clear();
        roles.clear();
        user_roles.clear();
        self.next_id.store(1, Ordering::SeqCst);
        self.stats.write().await.record_reset();

        debug!("Dropped all roles");
    }

    /// Get role statistics
    pub async fn get_stats(&self) -> RoleStats {
        let stats = self.stats.read().await;
        stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RbacConfig;

    async fn manager() -> RoleManager {
        RoleManager::new(RbacConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_role_creation_and_lookup() {
        let manager = manager().await;

        let admin = manager
            .create_role("admin".to_string(), "Administrators".to_string())
            .await
            .unwrap();
        let member = manager
            .create_role("member".to_string(), String::new())
            .await
            .unwrap();

        assert_eq!(admin.id, 1);
        assert_eq!(member.id, 2);
        assert_eq!(manager.find_role_by_name("admin").await, Some(admin.clone()));
        assert_eq!(manager.get_role_by_id(2).await, Some(member));
        assert!(manager.find_role_by_name("Admin").await.is_none());
        assert_eq!(manager.list_roles().await.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_and_empty_role_names() {
        let manager = manager().await;
        manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();

        let result = manager.create_role("admin".to_string(), String::new()).await;
        assert!(matches!(result, Err(crate::AuthError::Conflict(_))));

        let result = manager.create_role("  ".to_string(), String::new()).await;
        assert!(matches!(result, Err(crate::AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_assignment_keeps_order() {
        let manager = manager().await;
        let admin = manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();
        let member = manager
            .create_role("member".to_string(), String::new())
            .await
            .unwrap();

        manager.assign_role_to_user(7, member.id).await.unwrap();
        manager.assign_role_to_user(7, admin.id).await.unwrap();
        manager.assign_role_to_user(7, member.id).await.unwrap();

        let names: Vec<String> = manager
            .get_user_roles(7)
            .await
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["member", "admin"]);
        assert_eq!(manager.get_stats().await.role_assignments, 2);
        assert_eq!(manager.users_with_role(admin.id).await, vec![7]);
    }

    #[tokio::test]
    async fn test_assign_unknown_role() {
        let manager = manager().await;
        let result = manager.assign_role_to_user(1, 42).await;
        assert!(matches!(result, Err(crate::AuthError::NotFound(_))));
        assert!(manager.get_user_roles(1).await.is_empty());
    }

    #[tokio::test]
    async fn test_max_roles_per_user() {
        let mut config = RbacConfig::default();
        config.max_roles_per_user = 1;
        let manager = RoleManager::new(config).await.unwrap();

        let admin = manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();
        let member = manager
            .create_role("member".to_string(), String::new())
            .await
            .unwrap();

        manager.assign_role_to_user(1, admin.id).await.unwrap();
        let result = manager.assign_role_to_user(1, member.id).await;
        assert!(matches!(result, Err(crate::AuthError::Validation(_))));

        let stats = manager.get_stats().await;
        assert_eq!(stats.role_assignments, 1);
        assert_eq!(stats.rejected_assignments, 1);
    }

    #[tokio::test]
    async fn test_remove_role_from_user() {
        let manager = manager().await;
        let admin = manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();

        manager.assign_role_to_user(3, admin.id).await.unwrap();
        manager.remove_role_from_user(3, admin.id).await.unwrap();
        manager.remove_role_from_user(3, admin.id).await.unwrap();

        assert!(manager.get_user_roles(3).await.is_empty());
        assert_eq!(manager.get_stats().await.role_removals, 1);
    }

    #[tokio::test]
    async fn test_drop_all_resets_ids() {
        let manager = manager().await;
        let admin = manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();
        manager.assign_role_to_user(1, admin.id).await.unwrap();

        manager.drop_all().await;
        assert!(manager.list_roles().await.is_empty());
        assert!(manager.get_user_roles(1).await.is_empty());

        let role = manager
            .create_role("admin".to_string(), String::new())
            .await
            .unwrap();
        assert_eq!(role.id, 1);

        let stats = manager.get_stats().await;
        assert_eq!(stats.resets, 1);
        assert_eq!(stats.roles_created, 2);
    }
}
