//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! HTTP handlers for the portal pages

use admin_auth::Actor;
use axum::{
    async_trait,
    extract::{FromRequest, Query, Request, State},
    http::{header::CONTENT_TYPE, header::SET_COOKIE, Uri},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::flash::FlashStore;
use crate::middleware::{expired_session_cookie, session_cookie, CurrentActor, SessionToken};
use crate::rest::AppState;
use crate::{PORTAL_NAME, PORTAL_VERSION};

/// Login page path
pub const LOGIN_PATH: &str = "/login";

/// Template rendered for the home page
pub const HOME_TEMPLATE: &str = "index.html";

/// Template rendered for the login form
pub const LOGIN_TEMPLATE: &str = "security/login_user.html";

/// Redirect to the login page, returning to `next` afterwards
pub fn login_redirect(next: &str) -> Redirect {
    Redirect::to(&format!("{}?next={}", LOGIN_PATH, next))
}

/// Only local absolute paths are followed after login
///
/// Browsers read `/\host` like `//host`, so backslashes and control
/// characters are refused anywhere in the path.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => "/".to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/') | Some('\\'))
        && !path.chars().any(|c| c == '\\' || c.is_control())
}

/// Home page context
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub template: &'static str,
    pub user: Actor,
    pub messages: Vec<crate::flash::FlashMessage>,
}

/// Home page, login required
pub async fn home(State(state): State<AppState>, CurrentActor(actor): CurrentActor) -> Response {
    if !actor.is_authenticated {
        debug!("Anonymous request for home page");
        return login_redirect("/").into_response();
    }

    let messages = state.flash.drain(&FlashStore::key_for(&actor));
    Json(HomePage {
        template: HOME_TEMPLATE,
        user: actor,
        messages,
    })
    .into_response()
}

/// Query of the login page
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Login form description
pub async fn login_form(Query(query): Query<LoginQuery>) -> Json<serde_json::Value> {
    Json(json!({
        "template": LOGIN_TEMPLATE,
        "next": safe_next(query.next.as_deref()),
        "fields": ["email", "password"],
    }))
}

/// Login credentials
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,

    #[serde(default)]
    pub next: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<sensitive>")
            .field("next", &self.next)
            .finish()
    }
}

/// Login credentials from a form post or a JSON body
#[derive(Debug)]
pub struct LoginPayload {
    pub request: LoginRequest,
    pub json: bool,
}

#[async_trait]
impl<S> FromRequest<S> for LoginPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(request) = Json::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self {
                request,
                json: true,
            })
        } else {
            let Form(request) = Form::<LoginRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self {
                request,
                json: false,
            })
        }
    }
}

/// Body returned to JSON login clients
#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub actor: Actor,
    pub next: String,
}

/// Log in and set the session cookie
pub async fn login(State(state): State<AppState>, payload: LoginPayload) -> ApiResult<Response> {
    let LoginPayload { request, json } = payload;

    let response = match state.auth.login(&request.email, &request.password).await {
        Ok(response) => response,
        Err(e) => {
            warn!("Login failed for {}: {}", request.email, e);
            return Err(e.into());
        }
    };

    let cookie = session_cookie(
        &response.token,
        state.config.auth.session.expiration_secs,
        state.config.http.secure_cookies,
    );
    let next = safe_next(request.next.as_deref());
    info!("Session started for {}", request.email);

    if json {
        let body = LoginBody {
            token: response.token,
            expires_at: response.expires_at,
            actor: response.actor,
            next,
        };
        Ok(([(SET_COOKIE, cookie)], Json(body)).into_response())
    } else {
        Ok(([(SET_COOKIE, cookie)], Redirect::to(&next)).into_response())
    }
}

/// Revoke the session, clear the cookie and go home
pub async fn logout(State(state): State<AppState>, SessionToken(token): SessionToken) -> Response {
    if let Some(token) = token {
        if let Err(e) = state.auth.logout(&token).await {
            debug!("Logout with unusable session: {}", e);
        }
    }

    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/")).into_response()
}

/// Liveness check
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": PORTAL_NAME,
        "version": PORTAL_VERSION,
        "initialized": state.auth.is_initialized().await,
        "timestamp": Utc::now(),
    }))
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
