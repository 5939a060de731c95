//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Configuration for the admin portal
//!
//! Values are layered: built-in defaults, then the TOML file, then
//! environment variables prefixed with `PORTAL` using `__` as the nesting
//! separator (for example `PORTAL__HTTP__PORT=8080` or
//! `PORTAL__AUTH__SESSION__SECRET=...`).

use admin_auth::{AuthConfig, SeedConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ApiError, ApiResult};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PORTAL";

/// Admin portal configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// HTTP server configuration
    pub http: HttpConfig,

    /// Admin panel configuration
    pub admin: AdminConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Demo data seeding
    pub seed: SeedConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            secure_cookies: false,
        }
    }
}

/// Admin panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount point of the admin panel
    pub url: String,

    /// Display name
    pub name: String,

    /// Layout template every admin page extends
    pub base_template: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            url: "/admin".to_string(),
            name: "Admin".to_string(),
            base_template: "admin_layout.html".to_string(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from a file, with environment overrides
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(path, true)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(path, false)
    }

    fn build(path: &Path, required: bool) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate the configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.http.host.is_empty() {
            return Err(ApiError::Configuration(
                "HTTP host cannot be empty".to_string(),
            ));
        }

        if !self.admin.url.starts_with('/') || self.admin.url.trim_end_matches('/').is_empty() {
            return Err(ApiError::Configuration(format!(
                "Admin url must be an absolute path below the root, got '{}'",
                self.admin.url
            )));
        }

        if self.admin.base_template.is_empty() {
            return Err(ApiError::Configuration(
                "Admin base template cannot be empty".to_string(),
            ));
        }

        self.auth.validate()?;

        Ok(())
    }

    /// Get HTTP bind address
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.http.host, self.http.port)
    }
}
