//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Identity store, sessions and access gating for the admin portal
//!
//! This crate holds everything the portal needs to know about who is making
//! a request and what they may see.
//!
//! # Features
//!
//! - **Identity store**: users and roles with an ordered `roles_users` relation
//! - **Sessions**: signed, revocable session tokens
//! - **Access gate**: per-view policies deciding admin panel access
//! - **Seeding**: one-time demo data initialisation with an explicit teardown
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use admin_auth::{AccessPolicy, AuthConfig, AuthManager, SeedConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth_manager = AuthManager::new(AuthConfig::default()).await?;
//!     auth_manager.initialize(&SeedConfig::default()).await?;
//!
//!     let login = auth_manager.login("umutcan@umutcan", "password").await?;
//!     let actor = auth_manager.resolve_actor(Some(&login.token)).await;
//!
//!     let gate = auth_manager.gate(AccessPolicy::ModelView);
//!     assert!(gate.is_accessible(&actor));
//!     Ok(())
//! }
//! ```
//!
//! # Access policies
//!
//! Two policies guard the admin panel. Both require the actor's *first*
//! role to be the configured admin role; the index additionally requires an
//! authenticated actor while model views do not. A third policy,
//! `RoleMembership`, checks every role instead of the first and is
//! available for views that want it.

pub mod auth;
pub mod config;
pub mod gate;
pub mod roles;
pub mod seed;
pub mod session;
pub mod users;

// Re-export commonly used types
pub use auth::{AuthError, AuthManager, AuthResult, AuthStats, LoginResponse};
pub use config::{AuthConfig, PasswordComplexity, RbacConfig, SessionConfig, UserConfig};
pub use gate::{AccessGate, AccessPolicy, Actor};
pub use roles::{Role, RoleId, RoleManager, RoleStats};
pub use seed::{RoleSeed, SeedConfig, SeedReport, UserSeed};
pub use session::{SessionClaims, SessionManager, SessionStats};
pub use users::{User, UserId, UserManager, UserStats};

/// Admin auth version
pub const ADMIN_AUTH_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Role name that grants model view access unless configured otherwise
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// Default session expiration time in seconds (24 hours)
pub const DEFAULT_SESSION_EXPIRATION_SECS: u64 = 24 * 60 * 60;

/// Initialize the auth system
///
/// Creates an `AuthManager` and runs the one-time seed against it. Used when
/// embedding the crate directly; the portal server seeds the manager held
/// in its own application state.
///
/// # Example
///
/// ```rust,no_run
/// use admin_auth::{init_auth_system, AuthConfig, SeedConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     let auth_manager = init_auth_system(AuthConfig::default(), &SeedConfig::default()).await?;
///     assert!(auth_manager.is_initialized().await);
///     Ok(())
/// }
/// ```
pub async fn init_auth_system(
    config: AuthConfig,
    seed: &SeedConfig,
) -> Result<AuthManager, Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("Initializing admin auth system v{}", ADMIN_AUTH_VERSION);

    let auth_manager = AuthManager::new(config).await?;
    let report = auth_manager.initialize(seed).await?;

    tracing::info!(
        roles = report.roles_created,
        users = report.users_created,
        "Admin auth system initialization completed"
    );
    Ok(auth_manager)
}

/// Shutdown the auth system
pub async fn shutdown_auth_system(
    auth_manager: AuthManager,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("Shutting down admin auth system");

    auth_manager.shutdown().await?;

    tracing::info!("Admin auth system shutdown completed");
    Ok(())
}
