//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Main authentication module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::gate::{AccessGate, AccessPolicy, Actor};
use crate::roles::RoleManager;
use crate::seed::{SeedConfig, SeedReport};
use crate::session::SessionManager;
use crate::users::{UserId, UserManager};

/// Authentication result type
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Account inactive: {0}")]
    AccountInactive(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Token validation failed: {0}")]
    TokenValidation(String),

    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Token revoked: {0}")]
    TokenRevoked(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn invalid_credentials(msg: String) -> Self {
        Self::InvalidCredentials(msg)
    }

    pub fn account_inactive(msg: String) -> Self {
        Self::AccountInactive(msg)
    }

    pub fn token_generation(msg: String) -> Self {
        Self::TokenGeneration(msg)
    }

    pub fn token_validation(msg: String) -> Self {
        Self::TokenValidation(msg)
    }

    pub fn token_expired(msg: String) -> Self {
        Self::TokenExpired(msg)
    }

    pub fn token_revoked(msg: String) -> Self {
        Self::TokenRevoked(msg)
    }

    pub fn not_found(msg: String) -> Self {
        Self::NotFound(msg)
    }

    pub fn conflict(msg: String) -> Self {
        Self::Conflict(msg)
    }

    pub fn validation(msg: String) -> Self {
        Self::Validation(msg)
    }

    pub fn configuration(msg: String) -> Self {
        Self::Configuration(msg)
    }

    pub fn internal(msg: String) -> Self {
        Self::Internal(msg)
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token
    pub token: String,

    /// The actor the token resolves to
    pub actor: Actor,

    /// Token expiration
    pub expires_at: DateTime<Utc>,
}

/// Authentication manager
///
/// Owns the identity store (users, roles and their join relation) and the
/// session manager. It is the single collaborator the web layer talks to:
/// logging actors in and out, resolving the current actor for a request,
/// handing out configured access gates, and running the one-time demo data
/// initialisation.
pub struct AuthManager {
    /// Configuration
    config: AuthConfig,

    /// Session manager
    session_manager: SessionManager,

    /// User manager
    user_manager: UserManager,

    /// Role manager
    role_manager: RoleManager,

    /// Seed report, set once `initialize` has run
    seeded: Mutex<Option<SeedReport>>,

    /// Statistics
    stats: Arc<RwLock<AuthStats>>,
}

impl AuthManager {
    /// Create new authentication manager
    pub async fn new(config: AuthConfig) -> AuthResult<Self> {
        info!("Creating authentication manager");

        config.validate()?;

        let session_manager = SessionManager::new(config.session.clone())?;
        let user_manager = UserManager::new(config.users.clone()).await?;
        let role_manager = RoleManager::new(config.rbac.clone()).await?;

        Ok(Self {
            config,
            session_manager,
            user_manager,
            role_manager,
            seeded: Mutex::new(None),
            stats: Arc::new(RwLock::new(AuthStats::default())),
        })
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginResponse> {
        let result = self.login_inner(email, password).await;

        {
            let mut stats = self.stats.write().await;
            match &result {
                Ok(_) => stats.successful_logins += 1,
                Err(_) => stats.failed_logins += 1,
            }
            stats.last_login = Some(Utc::now());
        }

        result
    }

    async fn login_inner(&self, email: &str, password: &str) -> AuthResult<LoginResponse> {
        let user = self
            .user_manager
            .get_user_by_email(email)
            .await
            .ok_or_else(|| AuthError::invalid_credentials("Invalid email or password".to_string()))?;

        if !self.user_manager.verify_password(user.id, password).await? {
            warn!("Failed login for {}", email);
            return Err(AuthError::invalid_credentials(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.active {
            return Err(AuthError::account_inactive(
                "Account is deactivated".to_string(),
            ));
        }

        self.user_manager.record_login(user.id).await?;

        let token = self.session_manager.issue(user.id).await?;
        let actor = self.actor_for_user(user.id).await?;
        let expires_at = Utc::now()
            .checked_add_signed(self.config.session.lifetime()?)
            .ok_or_else(|| {
                AuthError::configuration("Session expiration is out of range".to_string())
            })?;

        info!("User {} logged in", user.email);
        Ok(LoginResponse {
            token,
            actor,
            expires_at,
        })
    }

    /// Resolve the actor behind a session token
    ///
    /// Never fails: every way of not having a usable session (no token, a bad
    /// or revoked token, a vanished or deactivated user) yields the anonymous
    /// actor, which the access gates always evaluate safely.
    pub async fn resolve_actor(&self, token: Option<&str>) -> Actor {
        let Some(token) = token else {
            return Actor::anonymous();
        };

        let claims = match self.session_manager.validate(token).await {
            Ok(claims) => claims,
            Err(e) => {
                debug!("Session rejected: {}", e);
                return Actor::anonymous();
            }
        };

        let Some(user_id) = claims.user_id() else {
            debug!("Session subject is not a user id: {}", claims.sub);
            return Actor::anonymous();
        };

        match self.actor_for_user(user_id).await {
            Ok(actor) if actor.is_active => actor,
            Ok(_) => {
                debug!("Session for inactive user {}", user_id);
                Actor::anonymous()
            }
            Err(e) => {
                debug!("Session user could not be loaded: {}", e);
                Actor::anonymous()
            }
        }
    }

    /// Build the authenticated actor for a stored user
    pub async fn actor_for_user(&self, user_id: UserId) -> AuthResult<Actor> {
        let user = self
            .user_manager
            .get_user_by_id(user_id)
            .await
            .ok_or_else(|| AuthError::not_found(format!("User {} not found", user_id)))?;
        let roles = self.role_manager.get_user_roles(user_id).await;

        Ok(Actor::from_user(&user, roles))
    }

    /// Logout (revoke session token)
    pub async fn logout(&self, token: &str) -> AuthResult<()> {
        self.session_manager.revoke(token.to_string()).await?;

        let mut stats = self.stats.write().await;
        stats.logouts += 1;
        Ok(())
    }

    /// Access gate for a policy, using the configured admin role name
    pub fn gate(&self, policy: AccessPolicy) -> AccessGate {
        AccessGate::new(policy).with_admin_role(self.config.rbac.admin_role.clone())
    }

    /// Seed the store once
    ///
    /// The first call creates the configured roles and users; every later call
    /// returns the report of that first run without touching the store.
    /// Callers racing on startup serialise on the init flag.
    pub async fn initialize(&self, seed: &SeedConfig) -> AuthResult<SeedReport> {
        let mut seeded = self.seeded.lock().await;
        if let Some(report) = seeded.as_ref() {
            debug!("Store already initialised at {}", report.seeded_at);
            return Ok(report.clone());
        }

        if seed.reset_on_start {
            self.drop_all().await;
        }

        let report = crate::seed::run(seed, &self.user_manager, &self.role_manager).await?;
        *seeded = Some(report.clone());
        Ok(report)
    }

    /// Drop all data and clear the init flag
    pub async fn teardown(&self) {
        let mut seeded = self.seeded.lock().await;
        self.drop_all().await;
        *seeded = None;
        info!("Identity store torn down");
    }

    /// Whether `initialize` has completed since the last teardown
    pub async fn is_initialized(&self) -> bool {
        self.seeded.lock().await.is_some()
    }

    /// User ids restart after this, so every issued session goes with it
    async fn drop_all(&self) {
        self.role_manager.drop_all().await;
        self.user_manager.drop_all().await;
        self.session_manager.invalidate_all().await;
    }

    /// Get authentication statistics
    pub async fn get_stats(&self) -> AuthStats {
        let stats = self.stats.read().await;
        stats.clone()
    }

    /// Get configuration
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Get session manager
    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    /// Get user manager
    pub fn user_manager(&self) -> &UserManager {
        &self.user_manager
    }

    /// Get role manager
    pub fn role_manager(&self) -> &RoleManager {
        &self.role_manager
    }

    /// Shutdown authentication manager
    pub async fn shutdown(&self) -> AuthResult<()> {
        info!("Shutting down authentication manager");

        let cleaned = self.session_manager.cleanup_revoked().await;
        if cleaned > 0 {
            info!("Cleaned up {} expired revoked sessions", cleaned);
        }

        info!("Authentication manager shutdown completed");
        Ok(())
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("config", &"<sensitive>")
            .field("session_manager", &"<sensitive>")
            .field("user_manager", &self.user_manager)
            .field("role_manager", &self.role_manager)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Authentication statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuthStats {
    /// Number of successful logins
    pub successful_logins: u64,

    /// Number of failed logins
    pub failed_logins: u64,

    /// Number of logouts
    pub logouts: u64,

    /// Last login attempt
    pub last_login: Option<DateTime<Utc>>,
}
