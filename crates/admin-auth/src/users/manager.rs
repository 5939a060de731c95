//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! User management functionality

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::UserConfig;

use super::model::{User, UserId};
use super::stats::UserStats;

/// User manager
#[derive(Debug)]
pub struct UserManager {
    /// User configuration
    config: UserConfig,

    /// Users storage
    users: Arc<RwLock<BTreeMap<UserId, User>>>,

    /// Email to user ID mapping
    email_to_id: Arc<RwLock<HashMap<String, UserId>>>,

    /// Next user ID
    next_id: AtomicU64,

    /// Statistics
    stats: Arc<RwLock<UserStats>>,
}

impl UserManager {
    /// Create new user manager
    pub async fn new(config: UserConfig) -> crate::AuthResult<Self> {
        Ok(Self {
            config,
            users: Arc::new(RwLock::new(BTreeMap::new())),
            email_to_id: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            stats: Arc::new(RwLock::new(UserStats::default())),
        })
    }

    /// Create new user
    pub async fn create_user(&self, email: String, password: String) -> crate::AuthResult<User> {
        if email.trim().is_empty() {
            return Err(crate::AuthError::validation(
                "Email cannot be empty".to_string(),
            ));
        }

        self.validate_password(&password)?;

        // Holding the email map across the insert keeps emails unique
        let mut email_map = self.email_to_id.write().await;
        if email_map.contains_key(&email) {
            return Err(crate::AuthError::conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }

        let password_hash = hash_password(&password)?;
        let user = User::new(self.next_id.fetch_add(1, Ordering::SeqCst), email, password_hash);

        {
            let mut users = self.users.write().await;
            users.insert(user.id, user.clone());
        }
        email_map.insert(user.email.clone(), user.id);
        drop(email_map);

        {
            let mut stats = self.stats.write().await;
            stats.increment_users_created();
        }

        info!("Created user: {}", user.email);
        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: UserId) -> Option<User> {
        let users = self.users.read().await;
        users.get(&user_id).cloned()
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = {
            let email_map = self.email_to_id.read().await;
            email_map.get(email).copied()
        };

        match user_id {
            Some(user_id) => self.get_user_by_id(user_id).await,
            None => None,
        }
    }

    /// List all users ordered by ID
    pub async fn list_users(&self) -> Vec<User> {
        let users = self.users.read().await;
        users.values().cloned().collect()
    }

    /// Verify password
    pub async fn verify_password(&self, user_id: UserId, password: &str) -> crate::AuthResult<bool> {
        let user = self
            .get_user_by_id(user_id)
            .await
            .ok_or_else(|| crate::AuthError::not_found(format!("User {} not found", user_id)))?;

        let verified = verify_password_hash(password, &user.password_hash)?;

        {
            let mut stats = self.stats.write().await;
            stats.record_password_verification(verified);
        }

        Ok(verified)
    }

    /// Confirm user
    ///
    /// Confirming an already confirmed user keeps the original timestamp.
    pub async fn confirm_user(&self, user_id: UserId) -> crate::AuthResult<User> {
        let (user, newly_confirmed) = self
            .update_user(user_id, |user| {
                if user.confirmed_at.is_some() {
                    return false;
                }
                user.confirmed_at = Some(chrono::Utc::now());
                true
            })
            .await?;

        if newly_confirmed {
            let mut stats = self.stats.write().await;
            stats.increment_users_confirmed();
            info!("Confirmed user: {}", user.email);
        }

        Ok(user)
    }

    /// Activate or deactivate user
    pub async fn set_active(&self, user_id: UserId, active: bool) -> crate::AuthResult<User> {
        let (user, _) = self
            .update_user(user_id, |user| {
                user.active = active;
            })
            .await?;

        info!("Set user {} active={}", user.email, active);
        Ok(user)
    }

    /// Record a successful login
    pub async fn record_login(&self, user_id: UserId) -> crate::AuthResult<()> {
        self.update_user(user_id, |user| {
            user.last_login_at = Some(chrono::Utc::now());
        })
        .await?;
        Ok(())
    }

    /// Drop every user
    pub async fn drop_all(&self) {
        let mut email_map = self.email_to_id.write().await;
        let mut users = self.users.write().await;

        email_map.clear();
        users.clear();
        self.next_id.store(1, Ordering::SeqCst);

        debug!("Dropped all users");
    }

    /// Get user statistics
    pub async fn get_stats(&self) -> UserStats {
        let stats = self.stats.read().await;
        stats.clone()
    }

    async fn update_user<R>(
        &self,
        user_id: UserId,
        update: impl FnOnce(&mut User) -> R,
    ) -> crate::AuthResult<(User, R)> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| crate::AuthError::not_found(format!("User {} not found", user_id)))?;

        let result = update(user);
        Ok((user.clone(), result))
    }

    /// Validate password
    fn validate_password(&self, password: &str) -> crate::AuthResult<()> {
        if password.chars().count() < self.config.min_password_length {
            return Err(crate::AuthError::validation(format!(
                "Password must be at least {} characters long",
                self.config.min_password_length
            )));
        }

        let complexity = &self.config.password_complexity;

        if complexity.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(crate::AuthError::validation(
                "Password must contain uppercase letters".to_string(),
            ));
        }

        if complexity.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err(crate::AuthError::validation(
                "Password must contain lowercase letters".to_string(),
            ));
        }

        if complexity.require_numbers && !password.chars().any(|c| c.is_numeric()) {
            return Err(crate::AuthError::validation(
                "Password must contain numbers".to_string(),
            ));
        }

        if complexity.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(crate::AuthError::validation(
                "Password must contain special characters".to_string(),
            ));
        }

        Ok(())
    }
}

/// Hash password with argon2 defaults
fn hash_password(password: &str) -> crate::AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| crate::AuthError::internal(format!("Failed to hash password: {}", e)))
}

/// Verify password against a PHC string
fn verify_password_hash(password: &str, hash: &str) -> crate::AuthResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| crate::AuthError::internal(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PasswordComplexity, UserConfig};

    async fn manager() -> UserManager {
        UserManager::new(UserConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_user_creation() {
        let manager = manager().await;

        let user = manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.email, "test@example.com");
        assert!(user.active);
        assert!(user.password_hash.starts_with("$argon2"));
        assert_ne!(user.password_hash, "password");
        assert_eq!(manager.get_stats().await.users_created, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let manager = manager().await;
        manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        let result = manager
            .create_user("test@example.com".to_string(), "password2".to_string())
            .await;
        assert!(matches!(result, Err(crate::AuthError::Conflict(_))));
        assert_eq!(manager.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_password_policy() {
        let mut config = UserConfig::default();
        config.password_complexity = PasswordComplexity {
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_special: false,
        };
        let manager = UserManager::new(config).await.unwrap();

        let short = manager
            .create_user("a@example.com".to_string(), "Ab1".to_string())
            .await;
        assert!(matches!(short, Err(crate::AuthError::Validation(_))));

        let no_upper = manager
            .create_user("a@example.com".to_string(), "password1".to_string())
            .await;
        assert!(matches!(no_upper, Err(crate::AuthError::Validation(_))));

        let ok = manager
            .create_user("a@example.com".to_string(), "Password1".to_string())
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let manager = manager().await;
        let result = manager
            .create_user(" ".to_string(), "password".to_string())
            .await;
        assert!(matches!(result, Err(crate::AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_verify_password() {
        let manager = manager().await;
        let user = manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        assert!(manager.verify_password(user.id, "password").await.unwrap());
        assert!(!manager.verify_password(user.id, "Password").await.unwrap());
        assert!(manager.verify_password(99, "password").await.is_err());

        let stats = manager.get_stats().await;
        assert_eq!(stats.password_verifications, 2);
        assert_eq!(stats.failed_verifications, 1);
    }

    #[tokio::test]
    async fn test_confirm_user_is_idempotent() {
        let manager = manager().await;
        let user = manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        let first = manager.confirm_user(user.id).await.unwrap();
        let second = manager.confirm_user(user.id).await.unwrap();

        assert!(first.is_confirmed());
        assert_eq!(first.confirmed_at, second.confirmed_at);
        assert_eq!(manager.get_stats().await.users_confirmed, 1);
        assert!(matches!(
            manager.confirm_user(42).await,
            Err(crate::AuthError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_and_listing() {
        let manager = manager().await;
        manager
            .create_user("b@example.com".to_string(), "password".to_string())
            .await
            .unwrap();
        manager
            .create_user("a@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        let emails: Vec<String> = manager
            .list_users()
            .await
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["b@example.com", "a@example.com"]);

        let user = manager.get_user_by_email("a@example.com").await.unwrap();
        assert_eq!(user.id, 2);
        assert!(manager.get_user_by_email("c@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_set_active_and_record_login() {
        let manager = manager().await;
        let user = manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        let user = manager.set_active(user.id, false).await.unwrap();
        assert!(!user.active);

        manager.record_login(user.id).await.unwrap();
        let user = manager.get_user_by_id(user.id).await.unwrap();
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_drop_all() {
        let manager = manager().await;
        manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();

        manager.drop_all().await;
        assert!(manager.list_users().await.is_empty());
        assert!(manager.get_user_by_email("test@example.com").await.is_none());

        let user = manager
            .create_user("test@example.com".to_string(), "password".to_string())
            .await
            .unwrap();
        assert_eq!(user.id, 1);
    }
}
