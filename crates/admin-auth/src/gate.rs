//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Access gate for administrative surfaces
//!
//! The admin panel asks a gate, once per request, whether the current actor
//! may see a surface. Two policies exist because the admin index page and the
//! per-model views historically guard differently:
//!
//! - [`AccessPolicy::AdminIndex`] requires an authenticated actor whose first
//!   role is the admin role.
//! - [`AccessPolicy::ModelView`] only requires that the first role is the
//!   admin role. It does not look at authentication.
//!
//! Both read `roles[0]`, so the order of the actor's role collection matters.
//! [`AccessPolicy::RoleMembership`] is the order-independent alternative
//! (any role named admin, authenticated actor); nothing uses it by default.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::users::{User, UserId};
use crate::DEFAULT_ADMIN_ROLE;

/// A party attempting to access a protected view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Stored user id, if the actor is backed by a user
    pub user_id: Option<UserId>,

    /// Email of the backing user
    pub email: Option<String>,

    /// Whether the backing account is active
    pub is_active: bool,

    /// Whether the actor holds a valid session
    pub is_authenticated: bool,

    /// Assigned roles, in join order
    pub roles: Vec<Role>,
}

impl Actor {
    /// The actor of a request without a usable session
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Authenticated actor for a stored user
    pub fn from_user(user: &User, roles: Vec<Role>) -> Self {
        Self {
            user_id: Some(user.id),
            email: Some(user.email.clone()),
            is_active: user.active,
            is_authenticated: true,
            roles,
        }
    }

    /// Append a role
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    /// Append several roles, keeping their order
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles.extend(roles);
        self
    }

    /// Drop the authenticated flag, keeping identity and roles
    pub fn unauthenticated(mut self) -> Self {
        self.is_authenticated = false;
        self
    }

    /// First role in the collection
    pub fn first_role(&self) -> Option<&Role> {
        self.roles.first()
    }

    /// Whether any role carries this exact name
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    /// Whether the first role carries this exact name
    pub fn is_admin(&self, admin_role: &str) -> bool {
        self.first_role().is_some_and(|r| r.name == admin_role)
    }
}

/// Named access policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Authenticated and first role is admin
    AdminIndex,

    /// First role is admin; authentication is not checked
    ModelView,

    /// Authenticated and any role is admin
    RoleMembership,
}

impl AccessPolicy {
    /// Decide access for an actor
    pub fn evaluate(&self, actor: &Actor, admin_role: &str) -> bool {
        match self {
            AccessPolicy::AdminIndex => actor.is_authenticated && actor.is_admin(admin_role),
            AccessPolicy::ModelView => actor.is_admin(admin_role),
            AccessPolicy::RoleMembership => actor.is_authenticated && actor.has_role(admin_role),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccessPolicy::AdminIndex => "admin_index",
            AccessPolicy::ModelView => "model_view",
            AccessPolicy::RoleMembership => "role_membership",
        }
    }
}

impl std::fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Access gate: a policy bound to an admin role name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    policy: AccessPolicy,
    admin_role: String,
}

impl AccessGate {
    /// Create a gate for a policy with the default admin role
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            admin_role: DEFAULT_ADMIN_ROLE.to_string(),
        }
    }

    /// Gate for the admin index page
    pub fn admin_index() -> Self {
        Self::new(AccessPolicy::AdminIndex)
    }

    /// Gate for per-model admin views
    pub fn model_view() -> Self {
        Self::new(AccessPolicy::ModelView)
    }

    /// Order-independent gate
    pub fn role_membership() -> Self {
        Self::new(AccessPolicy::RoleMembership)
    }

    /// Override the admin role name
    pub fn with_admin_role(mut self, admin_role: impl Into<String>) -> Self {
        self.admin_role = admin_role.into();
        self
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    pub fn admin_role(&self) -> &str {
        &self.admin_role
    }

    /// Whether the actor may see the guarded surface
    pub fn is_accessible(&self, actor: &Actor) -> bool {
        self.policy.evaluate(actor, &self.admin_role)
    }
}
