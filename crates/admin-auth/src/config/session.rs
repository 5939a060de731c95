//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Session configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Longest accepted session lifetime in seconds
pub const MAX_SESSION_EXPIRATION_SECS: u64 = i32::MAX as u64;

/// Session configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Secret used to sign session tokens
    pub secret: String,

    /// Session lifetime in seconds
    pub expiration_secs: u64,

    /// Token issuer
    pub issuer: String,

    /// Token audience
    pub audience: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: "super-secret".to_string(),
            expiration_secs: crate::DEFAULT_SESSION_EXPIRATION_SECS,
            issuer: "admin-portal".to_string(),
            audience: "admin-portal-users".to_string(),
        }
    }
}

impl SessionConfig {
    /// Session lifetime as a duration
    pub fn lifetime(&self) -> crate::AuthResult<Duration> {
        if self.expiration_secs > MAX_SESSION_EXPIRATION_SECS {
            return Err(crate::AuthError::configuration(format!(
                "Session expiration cannot exceed {} seconds",
                MAX_SESSION_EXPIRATION_SECS
            )));
        }

        Duration::try_seconds(self.expiration_secs as i64).ok_or_else(|| {
            crate::AuthError::configuration("Session expiration is out of range".to_string())
        })
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<sensitive>")
            .field("expiration_secs", &self.expiration_secs)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert!(!config.secret.is_empty());
        assert_eq!(config.expiration_secs, crate::DEFAULT_SESSION_EXPIRATION_SECS);
        assert_eq!(config.issuer, "admin-portal");
        assert_eq!(config.audience, "admin-portal-users");
    }

    #[test]
    fn test_session_lifetime_bounds() {
        let mut config = SessionConfig::default();
        assert_eq!(config.lifetime().unwrap(), Duration::days(1));

        config.expiration_secs = MAX_SESSION_EXPIRATION_SECS;
        assert!(config.lifetime().is_ok());

        config.expiration_secs = u64::MAX / 2;
        assert!(matches!(
            config.lifetime(),
            Err(crate::AuthError::Configuration(_))
        ));
    }

    #[test]
    fn test_session_config_debug_hides_secret() {
        let config = SessionConfig::default();
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret"));
    }
}
