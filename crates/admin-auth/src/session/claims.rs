//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Session token claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::users::UserId;

/// Session claims
///
/// Only identity is carried. Roles are looked up on every request so the
/// stored assignment order stays authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at
    pub iat: i64,

    /// Expiration time
    pub exp: i64,

    /// Not before
    pub nbf: i64,

    /// Token ID
    pub jti: String,

    /// Store generation the session was issued under
    #[serde(default)]
    pub generation: u64,
}

impl SessionClaims {
    /// Create new claims for a user
    pub fn new(
        user_id: UserId,
        generation: u64,
        config: &SessionConfig,
    ) -> crate::AuthResult<Self> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(config.lifetime()?).ok_or_else(|| {
            crate::AuthError::configuration("Session expiration is out of range".to_string())
        })?;

        Ok(Self {
            sub: user_id.to_string(),
            iss: config.issuer.clone(),
            aud: config.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            generation,
        })
    }

    /// User ID, if the subject is one
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }

    /// Check if token is expired
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    /// Get expiration time as DateTime
    pub fn expiration_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let config = SessionConfig::default();
        let claims = SessionClaims::new(42, 3, &config).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.iss, config.issuer);
        assert_eq!(claims.exp - claims.iat, config.expiration_secs as i64);
        assert!(!claims.is_expired());
        assert!(!claims.jti.is_empty());
        assert_eq!(claims.generation, 3);
    }

    #[test]
    fn test_claims_reject_unbounded_lifetime() {
        let mut config = SessionConfig::default();
        config.expiration_secs = u64::MAX / 2;
        assert!(matches!(
            SessionClaims::new(1, 0, &config),
            Err(crate::AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_claims_expiry() {
        let mut claims = SessionClaims::new(1, 0, &SessionConfig::default()).unwrap();
        claims.exp = Utc::now().timestamp() - 10;
        assert!(claims.is_expired());
        assert!(claims.expiration_time() < Utc::now());
    }

    #[test]
    fn test_non_numeric_subject() {
        let mut claims = SessionClaims::new(1, 0, &SessionConfig::default()).unwrap();
        claims.sub = "someone".to_string();
        assert_eq!(claims.user_id(), None);
    }
}
