//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Demo data seeding
//!
//! Seeding runs through [`AuthManager::initialize`](crate::AuthManager::initialize),
//! which makes it a one-time step per store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::roles::RoleManager;
use crate::users::UserManager;

/// Role to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSeed {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// User to create, with the name of the role to give it
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSeed {
    pub email: String,
    pub password: String,
    pub role: String,
}

impl std::fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSeed")
            .field("email", &self.email)
            .field("password", &"<sensitive>")
            .field("role", &self.role)
            .finish()
    }
}

/// Seed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Whether to seed at all
    pub enabled: bool,

    /// Drop existing data before seeding
    pub reset_on_start: bool,

    /// Roles, created in order
    pub roles: Vec<RoleSeed>,

    /// Users, created in order after the roles
    pub users: Vec<UserSeed>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reset_on_start: true,
            roles: vec![
                RoleSeed {
                    name: "admin".to_string(),
                    description: String::new(),
                },
                RoleSeed {
                    name: "member".to_string(),
                    description: String::new(),
                },
            ],
            users: vec![
                UserSeed {
                    email: "umutcan@umutcan".to_string(),
                    password: "password".to_string(),
                    role: "admin".to_string(),
                },
                UserSeed {
                    email: "deneme".to_string(),
                    password: "password".to_string(),
                    role: "member".to_string(),
                },
            ],
        }
    }
}

impl SeedConfig {
    /// A configuration that seeds nothing
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedReport {
    pub roles_created: usize,
    pub users_created: usize,
    pub seeded_at: DateTime<Utc>,
}

/// Create the configured roles, then the users with their role
pub(crate) async fn run(
    seed: &SeedConfig,
    users: &UserManager,
    roles: &RoleManager,
) -> crate::AuthResult<SeedReport> {
    let mut report = SeedReport {
        roles_created: 0,
        users_created: 0,
        seeded_at: Utc::now(),
    };

    if !seed.enabled {
        info!("Seeding disabled");
        return Ok(report);
    }

    for role in &seed.roles {
        roles
            .create_role(role.name.clone(), role.description.clone())
            .await?;
        report.roles_created += 1;
    }

    for entry in &seed.users {
        let role = roles.find_role_by_name(&entry.role).await.ok_or_else(|| {
            crate::AuthError::not_found(format!(
                "Seed user '{}' names unknown role '{}'",
                entry.email, entry.role
            ))
        })?;

        let user = users
            .create_user(entry.email.clone(), entry.password.clone())
            .await?;
        roles.assign_role_to_user(user.id, role.id).await?;
        report.users_created += 1;
    }

    info!(
        "Seeded {} roles and {} users",
        report.roles_created, report.users_created
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RbacConfig, UserConfig};

    async fn managers() -> (UserManager, RoleManager) {
        (
            UserManager::new(UserConfig::default()).await.unwrap(),
            RoleManager::new(RbacConfig::default()).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_default_seed_creates_demo_data() {
        let (users, roles) = managers().await;

        let report = run(&SeedConfig::default(), &users, &roles).await.unwrap();
        assert_eq!(report.roles_created, 2);
        assert_eq!(report.users_created, 2);

        let admin = users.get_user_by_email("umutcan@umutcan").await.unwrap();
        let admin_roles = roles.get_user_roles(admin.id).await;
        assert_eq!(admin_roles.len(), 1);
        assert_eq!(admin_roles[0].name, "admin");

        let member = users.get_user_by_email("deneme").await.unwrap();
        assert_eq!(roles.get_user_roles(member.id).await[0].name, "member");
        assert!(users.verify_password(member.id, "password").await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_seed_is_a_no_op() {
        let (users, roles) = managers().await;

        let report = run(&SeedConfig::disabled(), &users, &roles).await.unwrap();
        assert_eq!(report.roles_created, 0);
        assert!(users.list_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_role_fails() {
        let (users, roles) = managers().await;
        let mut seed = SeedConfig::default();
        seed.users[1].role = "owner".to_string();

        let result = run(&seed, &users, &roles).await;
        assert!(matches!(result, Err(crate::AuthError::NotFound(_))));
    }

    #[test]
    fn test_user_seed_debug_hides_password() {
        let seed = SeedConfig::default();
        let debug_output = format!("{:?}", seed.users[0]);
        assert!(debug_output.contains("umutcan@umutcan"));
        assert!(!debug_output.contains("\"password\""));
    }
}
