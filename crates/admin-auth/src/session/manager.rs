//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Session management functionality

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::users::UserId;

use super::claims::SessionClaims;
use super::stats::SessionStats;

/// Session manager
pub struct SessionManager {
    /// Session configuration
    config: SessionConfig,

    /// Encoding key
    encoding_key: EncodingKey,

    /// Decoding key
    decoding_key: DecodingKey,

    /// Revoked tokens and when they would have expired
    revoked: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,

    /// Sessions issued under an older generation are no longer valid
    generation: AtomicU64,

    /// Statistics
    stats: Arc<RwLock<SessionStats>>,
}

impl SessionManager {
    /// Create new session manager
    pub fn new(config: SessionConfig) -> crate::AuthResult<Self> {
        if config.secret.is_empty() {
            return Err(crate::AuthError::configuration(
                "Session secret cannot be empty".to_string(),
            ));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            revoked: Arc::new(RwLock::new(HashMap::new())),
            generation: AtomicU64::new(0),
            stats: Arc::new(RwLock::new(SessionStats::default())),
        })
    }

    /// Issue a session token for a user
    pub async fn issue(&self, user_id: UserId) -> crate::AuthResult<String> {
        let claims = SessionClaims::new(user_id, self.generation(), &self.config)?;

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| crate::AuthError::token_generation(e.to_string()))?;

        {
            let mut stats = self.stats.write().await;
            stats.increment_sessions_issued();
        }

        debug!("Issued session for user: {}", claims.sub);
        Ok(token)
    }

    /// Validate a session token
    pub async fn validate(&self, token: &str) -> crate::AuthResult<SessionClaims> {
        let result = self.validate_inner(token).await;

        {
            let mut stats = self.stats.write().await;
            match &result {
                Ok(_) => stats.increment_sessions_validated(),
                Err(_) => stats.increment_validation_failures(),
            }
        }

        result
    }

    async fn validate_inner(&self, token: &str) -> crate::AuthResult<SessionClaims> {
        {
            let revoked = self.revoked.read().await;
            if revoked.contains_key(token) {
                return Err(crate::AuthError::token_revoked(
                    "Session has been revoked".to_string(),
                ));
            }
        }

        let mut validation = Validation::default();
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        crate::AuthError::token_expired("Session has expired".to_string())
                    }
                    _ => crate::AuthError::token_validation(e.to_string()),
                }
            })?;

        if token_data.claims.generation != self.generation() {
            return Err(crate::AuthError::token_revoked(
                "Session was issued before the store was reset".to_string(),
            ));
        }

        Ok(token_data.claims)
    }

    /// Revoke a session token
    pub async fn revoke(&self, token: String) -> crate::AuthResult<()> {
        let claims = self.validate(&token).await?;

        let pruned = {
            let mut revoked = self.revoked.write().await;
            let pruned = prune_expired(&mut revoked, Utc::now());
            revoked.insert(token, claims.expiration_time());
            pruned
        };
        if pruned > 0 {
            debug!("Pruned {} expired revocations", pruned);
        }

        {
            let mut stats = self.stats.write().await;
            stats.increment_sessions_revoked();
        }

        info!("Revoked session for user: {}", claims.sub);
        Ok(())
    }

    /// Forget revoked tokens that have expired anyway
    pub async fn cleanup_revoked(&self) -> usize {
        let mut revoked = self.revoked.write().await;
        prune_expired(&mut revoked, Utc::now())
    }

    /// Invalidate every session issued so far
    ///
    /// Returns the new generation. Revocations are dropped with it since
    /// every earlier token now fails validation on its own.
    pub async fn invalidate_all(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.revoked.write().await.clear();

        info!("Invalidated all sessions, now at generation {}", generation);
        generation
    }

    /// Current session generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Number of revocations still remembered
    pub async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }

    /// Get session statistics
    pub async fn get_stats(&self) -> SessionStats {
        let stats = self.stats.read().await;
        stats.clone()
    }
}

fn prune_expired(revoked: &mut HashMap<String, DateTime<Utc>>, now: DateTime<Utc>) -> usize {
    let before = revoked.len();
    revoked.retain(|_, expiration| *expiration >= now);
    before - revoked.len()
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .field("encoding_key", &"<sensitive>")
            .field("decoding_key", &"<sensitive>")
            .field("revoked", &"<sensitive>")
            .field("generation", &self.generation())
            .field("stats", &self.stats)
            .finish()
    }
}
