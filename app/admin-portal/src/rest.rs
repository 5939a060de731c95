//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! HTTP routing for the admin portal

use admin_auth::AuthManager;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::admin::{portal_admin, Admin};
use crate::config::PortalConfig;
use crate::error::ApiResult;
use crate::flash::FlashStore;
use crate::handlers::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub auth: Arc<AuthManager>,
    pub flash: FlashStore,
    pub admin: Arc<Admin>,
}

impl AppState {
    /// Build state for a configuration
    ///
    /// The identity store starts empty; seeding is a separate
    /// `AuthManager::initialize` call.
    pub async fn new(config: PortalConfig) -> ApiResult<Self> {
        let auth = AuthManager::new(config.auth.clone()).await?;
        let admin = portal_admin(&config.admin)?;

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            flash: FlashStore::new(),
            admin: Arc::new(admin),
        })
    }
}

/// Create the portal router
pub fn create_router(state: AppState) -> Router {
    let admin_routes = state.admin.router();

    Router::new()
        .route("/", get(home))
        .route(LOGIN_PATH, get(login_form).post(login))
        .route("/logout", get(logout).post(logout))
        .route("/health", get(health))
        .merge(admin_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
