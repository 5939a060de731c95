//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Admin portal server

use axum::Router;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::config::PortalConfig;
use crate::error::{ApiError, ApiResult};
use crate::rest::{create_router, AppState};
use crate::PORTAL_VERSION;

/// Admin portal server
pub struct PortalServer {
    config: PortalConfig,
    state: Option<AppState>,
    shutdown_signal: Arc<RwLock<Option<broadcast::Sender<()>>>>,
}

impl PortalServer {
    /// Create a new server
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config,
            state: None,
            shutdown_signal: Arc::new(RwLock::new(None)),
        }
    }

    /// Build the application state and seed the identity store
    pub async fn init(&mut self) -> ApiResult<()> {
        tracing::info!("Initializing admin portal v{}", PORTAL_VERSION);

        self.config.validate()?;

        let state = AppState::new(self.config.clone()).await?;
        let report = state.auth.initialize(&self.config.seed).await?;
        tracing::info!(
            roles = report.roles_created,
            users = report.users_created,
            "Identity store initialized"
        );

        self.state = Some(state);
        tracing::info!("Admin portal initialized successfully");
        Ok(())
    }

    /// Router for the initialized server
    pub fn router(&self) -> ApiResult<Router> {
        self.state
            .clone()
            .map(create_router)
            .ok_or_else(|| ApiError::Internal("Server is not initialized".to_string()))
    }

    /// Serve until Ctrl+C, SIGTERM or [`PortalServer::stop`]
    pub async fn start(&self) -> ApiResult<()> {
        let router = self.router()?;
        let address = self.config.http_address();

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        {
            let mut signal_guard = self.shutdown_signal.write().await;
            *signal_guard = Some(shutdown_tx);
        }

        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!("Admin portal listening on {}", address);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Admin portal received stop request");
                    }
                }
            })
            .await?;

        self.shutdown().await
    }

    /// Ask a running server to stop
    pub async fn stop(&self) -> ApiResult<()> {
        tracing::info!("Stopping admin portal");

        if let Some(shutdown_tx) = self.shutdown_signal.write().await.take() {
            if shutdown_tx.send(()).is_err() {
                tracing::warn!("Failed to send shutdown signal");
            }
        }

        Ok(())
    }

    async fn shutdown(&self) -> ApiResult<()> {
        if let Some(state) = &self.state {
            state.auth.shutdown().await?;
        }

        tracing::info!("Admin portal stopped");
        Ok(())
    }

    /// Application state, once initialized
    pub fn state(&self) -> Option<&AppState> {
        self.state.as_ref()
    }

    /// Get configuration
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, shutting down");
        }
        _ = terminate => {
            tracing::info!("SIGTERM received, shutting down");
        }
    }
}
