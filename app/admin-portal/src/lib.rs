//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Admin portal web application
//!
//! A login-protected home page and an admin panel over the user and role
//! tables. Pages are answered as JSON contexts naming the template that
//! would render them.
//!
//! # Routes
//!
//! - `GET /`: home page, redirects anonymous visitors to the login page
//! - `GET /login`, `POST /login`: login form and form or JSON login
//! - `GET /logout`, `POST /logout`: end the session
//! - `GET /health`: liveness
//! - `GET /admin/`: admin index
//! - `GET /admin/user/`, `GET /admin/role/`: model lists
//! - `GET /admin/user/userview/approve/:id`: approve a user

pub mod admin;
pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod rest;
pub mod server;

pub use config::PortalConfig;
pub use error::{ApiError, ApiResult};
pub use rest::{create_router, AppState};
pub use server::PortalServer;

/// Service name
pub const PORTAL_NAME: &str = "admin-portal";

/// Service version
pub const PORTAL_VERSION: &str = env!("CARGO_PKG_VERSION");
