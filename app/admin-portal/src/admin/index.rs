//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Admin index page

use admin_auth::{AccessPolicy, Actor, AuthManager};
use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::flash::{FlashMessage, FlashStore};
use crate::middleware::CurrentActor;
use crate::rest::AppState;

/// Landing page of the admin panel
#[derive(Debug, Clone)]
pub struct AdminIndexView {
    pub name: String,
    pub template: String,
    pub policy: AccessPolicy,
}

impl Default for AdminIndexView {
    fn default() -> Self {
        Self {
            name: "Home".to_string(),
            template: "admin/index.html".to_string(),
            policy: AccessPolicy::AdminIndex,
        }
    }
}

impl AdminIndexView {
    pub fn is_accessible(&self, auth: &AuthManager, actor: &Actor) -> bool {
        auth.gate(self.policy).is_accessible(actor)
    }
}

/// Link to a registered view
#[derive(Debug, Clone, Serialize)]
pub struct ViewLink {
    pub name: String,
    pub endpoint: String,
    pub category: Option<String>,
    pub url: String,
}

/// Rendered index context
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub template: String,
    pub base_template: String,
    pub admin_name: String,
    pub user: Option<String>,
    pub views: Vec<ViewLink>,
    pub messages: Vec<FlashMessage>,
}

/// Admin index handler
pub async fn index(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> ApiResult<Json<IndexPage>> {
    let admin = &state.admin;
    let index_view = admin.index_view();

    if !index_view.is_accessible(&state.auth, &actor) {
        warn!(user_id = ?actor.user_id, "Access to admin index denied");
        return Err(ApiError::Forbidden(
            "Access to the admin index is not allowed".to_string(),
        ));
    }

    let views = admin
        .views()
        .iter()
        .map(|view| ViewLink {
            name: view.name().to_string(),
            endpoint: view.endpoint().to_string(),
            category: view.base().category.clone(),
            url: admin.list_url(view),
        })
        .collect();

    Ok(Json(IndexPage {
        template: index_view.template.clone(),
        base_template: admin.base_template().to_string(),
        admin_name: admin.name().to_string(),
        user: actor.email.clone(),
        views,
        messages: state.flash.drain(&FlashStore::key_for(&actor)),
    }))
}
