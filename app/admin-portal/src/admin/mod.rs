//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Admin panel
//!
//! The panel is an index page plus one list view per registered model, all
//! mounted below a common url. Each surface asks its access gate on every
//! request and answers 403 when denied.

pub mod index;
pub mod model_view;
pub mod views;

pub use index::{AdminIndexView, IndexPage, ViewLink};
pub use model_view::{
    BaseView, BaseViewOptions, ListPage, ListQuery, Model, ModelView, ModelViewConfig, Row,
};
pub use views::{portal_admin, role_view, user_view};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::AdminConfig;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentActor;
use crate::rest::AppState;

/// Admin panel registry
#[derive(Debug, Clone)]
pub struct Admin {
    url: String,
    name: String,
    base_template: String,
    index_view: AdminIndexView,
    views: Vec<Arc<ModelView>>,
}

impl Admin {
    /// Create an empty panel
    pub fn new(config: &AdminConfig) -> Self {
        Self {
            url: config.url.trim_end_matches('/').to_string(),
            name: config.name.clone(),
            base_template: config.base_template.clone(),
            index_view: AdminIndexView::default(),
            views: Vec::new(),
        }
    }

    /// Replace the index view
    pub fn with_index_view(mut self, index_view: AdminIndexView) -> Self {
        self.index_view = index_view;
        self
    }

    /// Register a model view
    pub fn add_view(&mut self, view: ModelView) -> ApiResult<()> {
        if self.view(view.endpoint()).is_some() {
            return Err(ApiError::Conflict(format!(
                "A view is already registered at endpoint '{}'",
                view.endpoint()
            )));
        }

        info!(
            "Registered admin view '{}' at {}/{}/",
            view.name(),
            self.url,
            view.endpoint()
        );
        self.views.push(Arc::new(view));
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_template(&self) -> &str {
        &self.base_template
    }

    pub fn index_view(&self) -> &AdminIndexView {
        &self.index_view
    }

    pub fn views(&self) -> &[Arc<ModelView>] {
        &self.views
    }

    /// Find a view by endpoint
    pub fn view(&self, endpoint: &str) -> Option<Arc<ModelView>> {
        self.views
            .iter()
            .find(|view| view.endpoint() == endpoint)
            .cloned()
    }

    /// Mount path of a view, without trailing slash
    pub fn view_path(&self, view: &ModelView) -> String {
        format!("{}/{}", self.url, view.endpoint())
    }

    /// Url of a view's list page
    pub fn list_url(&self, view: &ModelView) -> String {
        format!("{}/", self.view_path(view))
    }

    /// Routes for the index, every list view and their extra routes
    pub fn router(&self) -> Router<AppState> {
        let mut router = Router::new()
            .route(&self.url, get(index::index))
            .route(&format!("{}/", self.url), get(index::index));

        for view in &self.views {
            let path = self.view_path(view);
            let list = {
                let view = Arc::clone(view);
                move |State(state): State<AppState>,
                      CurrentActor(actor): CurrentActor,
                      Query(params): Query<HashMap<String, String>>| {
                    let view = Arc::clone(&view);
                    async move { view.render_list(&state, &actor, &params).await.map(Json) }
                }
            };

            router = router
                .route(&path, get(list.clone()))
                .route(&format!("{}/", path), get(list));

            if let Some(extra_routes) = view.extra_routes() {
                router = router.merge(extra_routes(&path));
            }
        }

        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_from_config() {
        let mut config = AdminConfig::default();
        config.url = "/backoffice/".to_string();

        let admin = Admin::new(&config);
        assert_eq!(admin.url(), "/backoffice");
        assert_eq!(admin.base_template(), "admin_layout.html");
        assert_eq!(admin.index_view().policy, admin_auth::AccessPolicy::AdminIndex);
    }

    #[test]
    fn test_view_urls() {
        let mut admin = Admin::new(&AdminConfig::default());
        admin.add_view(user_view()).unwrap();

        let view = admin.view("user").unwrap();
        assert_eq!(admin.view_path(&view), "/admin/user");
        assert_eq!(admin.list_url(&view), "/admin/user/");
        assert!(admin.view("role").is_none());
    }

    #[test]
    fn test_duplicate_endpoint_rejected() {
        let mut admin = Admin::new(&AdminConfig::default());
        admin.add_view(role_view()).unwrap();
        let result = admin.add_view(role_view());
        assert!(matches!(result, Err(ApiError::Conflict(_))));
        assert_eq!(admin.views().len(), 1);
    }
}
