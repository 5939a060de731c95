//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Main authentication configuration

use serde::{Deserialize, Serialize};

use super::rbac::RbacConfig;
use super::session::SessionConfig;
use super::user::UserConfig;

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Session configuration
    pub session: SessionConfig,

    /// User management configuration
    pub users: UserConfig,

    /// Role-based access control configuration
    pub rbac: RbacConfig,
}

impl AuthConfig {
    /// Validate the authentication configuration
    pub fn validate(&self) -> crate::AuthResult<()> {
        if self.session.secret.is_empty() {
            return Err(crate::AuthError::configuration(
                "Session secret cannot be empty".to_string(),
            ));
        }

        if self.session.expiration_secs == 0 {
            return Err(crate::AuthError::configuration(
                "Session expiration must be greater than zero".to_string(),
            ));
        }

        self.session.lifetime()?;

        if self.rbac.admin_role.is_empty() {
            return Err(crate::AuthError::configuration(
                "Admin role name cannot be empty".to_string(),
            ));
        }

        if self.rbac.max_roles_per_user == 0 {
            return Err(crate::AuthError::configuration(
                "max_roles_per_user must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Create configuration from environment variables
    ///
    /// Values not present in the environment keep their defaults. This is
    /// library API for embedders; the portal binary layers its settings
    /// through `PORTAL__AUTH__*` instead.
    ///
    /// # Environment Variables
    ///
    /// - `AUTH_SESSION_SECRET`: session signing secret
    /// - `AUTH_SESSION_EXPIRATION_SECS`: session lifetime (default: 86400)
    /// - `AUTH_SESSION_ISSUER`: token issuer (default: "admin-portal")
    /// - `AUTH_SESSION_AUDIENCE`: token audience (default: "admin-portal-users")
    /// - `AUTH_USERS_MIN_PASSWORD_LENGTH`: minimum password length (default: 8)
    /// - `AUTH_RBAC_ADMIN_ROLE`: admin role name (default: "admin")
    /// - `AUTH_RBAC_MAX_ROLES_PER_USER`: max roles per user (default: 5)
    pub fn from_env() -> crate::AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::AuthResult<Self> {
        let mut config = Self::default();

        if let Some(secret) = lookup("AUTH_SESSION_SECRET") {
            config.session.secret = secret;
        }

        if let Some(expiration) = lookup("AUTH_SESSION_EXPIRATION_SECS") {
            config.session.expiration_secs = expiration.parse().map_err(|_| {
                crate::AuthError::configuration(
                    "AUTH_SESSION_EXPIRATION_SECS must be a valid number".to_string(),
                )
            })?;
        }

        if let Some(issuer) = lookup("AUTH_SESSION_ISSUER") {
            config.session.issuer = issuer;
        }

        if let Some(audience) = lookup("AUTH_SESSION_AUDIENCE") {
            config.session.audience = audience;
        }

        if let Some(min_length) = lookup("AUTH_USERS_MIN_PASSWORD_LENGTH") {
            config.users.min_password_length = min_length.parse().map_err(|_| {
                crate::AuthError::configuration(
                    "AUTH_USERS_MIN_PASSWORD_LENGTH must be a valid number".to_string(),
                )
            })?;
        }

        if let Some(admin_role) = lookup("AUTH_RBAC_ADMIN_ROLE") {
            config.rbac.admin_role = admin_role;
        }

        if let Some(max_roles) = lookup("AUTH_RBAC_MAX_ROLES_PER_USER") {
            config.rbac.max_roles_per_user = max_roles.parse().map_err(|_| {
                crate::AuthError::configuration(
                    "AUTH_RBAC_MAX_ROLES_PER_USER must be a valid number".to_string(),
                )
            })?;
        }

        config.validate()?;

        Ok(config)
    }
}
