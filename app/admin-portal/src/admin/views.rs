//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! The portal's registered admin views

use admin_auth::UserId;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Redirect,
    routing::get,
    Router,
};
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::error::{ApiError, ApiResult};
use crate::flash::FlashStore;
use crate::middleware::CurrentActor;
use crate::rest::AppState;

use super::model_view::{Model, ModelView, ModelViewConfig};
use super::Admin;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Users, with a narrowed list and an approval action
pub fn user_view() -> ModelView {
    ModelView::new(
        Model::User,
        ModelViewConfig {
            column_list: Some(strings(&["id", "email", "active"])),
            list_template: Some("user_list.html".to_string()),
            column_searchable_list: Some(strings(&["email"])),
            column_filters: Some(strings(&["id", "email", "active"])),
            ..ModelViewConfig::default()
        },
    )
    .with_routes(user_routes)
}

/// Roles, with every default
pub fn role_view() -> ModelView {
    ModelView::new(Model::Role, ModelViewConfig::default())
}

/// The admin panel with the user and role views registered
pub fn portal_admin(config: &AdminConfig) -> ApiResult<Admin> {
    let mut admin = Admin::new(config);
    admin.add_view(user_view())?;
    admin.add_view(role_view())?;
    Ok(admin)
}

/// Fetch metadata header sent by browsers on every request
const SEC_FETCH_SITE: &str = "sec-fetch-site";

fn user_routes(view_path: &str) -> Router<AppState> {
    Router::new().route(
        &format!("{}/userview/approve/:id", view_path),
        get(approve_user).post(approve_user),
    )
}

/// Confirm a user, then go back to the user list
///
/// The list links to this with a plain GET, and the session cookie rides
/// along on top-level cross-site navigation, so cross-site requests are
/// refused by their fetch metadata.
pub async fn approve_user(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Redirect> {
    if is_cross_site(&headers) {
        warn!("Refused cross-site approval of user {}", id);
        return Err(ApiError::Forbidden(
            "Approval must come from the admin panel".to_string(),
        ));
    }

    let view = state
        .admin
        .views()
        .iter()
        .find(|view| view.model() == Model::User)
        .cloned()
        .ok_or_else(|| ApiError::NotFound("User view is not registered".to_string()))?;

    view.ensure_accessible(&state.auth, &actor)?;

    let user_id: UserId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("User {} not found", id)))?;
    let user = state.auth.user_manager().confirm_user(user_id).await?;

    state
        .flash
        .push(&FlashStore::key_for(&actor), format!("{} is approved", id));
    info!(approved_by = ?actor.user_id, "Approved user {}", user.email);

    Ok(Redirect::to(&state.admin.list_url(&view)))
}

fn is_cross_site(headers: &HeaderMap) -> bool {
    headers
        .get(SEC_FETCH_SITE)
        .and_then(|value| value.to_str().ok())
        .map(|site| site.eq_ignore_ascii_case("cross-site"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view_settings() {
        let view = user_view();
        assert_eq!(view.endpoint(), "user");
        assert_eq!(view.list_template(), "user_list.html");
        assert_eq!(view.column_list(), strings(&["id", "email", "active"]));
        assert!(view.extra_routes().is_some());
    }

    #[test]
    fn test_role_view_defaults() {
        let view = role_view();
        assert_eq!(view.endpoint(), "role");
        assert_eq!(view.column_list(), strings(&["id", "name", "description"]));
        assert!(view.extra_routes().is_none());
    }

    #[test]
    fn test_cross_site_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_cross_site(&headers));

        headers.insert(SEC_FETCH_SITE, "same-origin".parse().unwrap());
        assert!(!is_cross_site(&headers));

        headers.insert(SEC_FETCH_SITE, "none".parse().unwrap());
        assert!(!is_cross_site(&headers));

        headers.insert(SEC_FETCH_SITE, "cross-site".parse().unwrap());
        assert!(is_cross_site(&headers));
    }

    #[test]
    fn test_portal_admin_registers_views() {
        let admin = portal_admin(&AdminConfig::default()).unwrap();
        let endpoints: Vec<&str> = admin.views().iter().map(|v| v.endpoint()).collect();
        assert_eq!(endpoints, vec!["user", "role"]);
    }
}
