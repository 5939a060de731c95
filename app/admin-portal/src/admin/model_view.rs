//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! Per-model list views
//!
//! A [`ModelView`] is built from a model and a [`ModelViewConfig`]. The
//! config names the list settings a view may customise; everything else goes
//! through [`BaseViewOptions`] to the generic [`BaseView`] untouched.

use admin_auth::{AccessPolicy, Actor, AuthManager};
use axum::Router;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::flash::{FlashMessage, FlashStore};
use crate::rest::AppState;

/// Default list template
pub const DEFAULT_LIST_TEMPLATE: &str = "admin/model/list.html";

/// Query parameter carrying the search term
pub const SEARCH_PARAM: &str = "search";

/// Prefix of column filter query parameters
pub const FILTER_PREFIX: &str = "flt_";

/// One listed record, keyed by column
pub type Row = Map<String, Value>;

/// Builds the extra routes of a view from its mount path
pub type RouteFactory = fn(&str) -> Router<AppState>;

/// Models the admin panel can list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Model {
    User,
    Role,
}

impl Model {
    pub fn name(&self) -> &'static str {
        match self {
            Model::User => "User",
            Model::Role => "Role",
        }
    }

    /// Every listable column, in display order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Model::User => &["id", "email", "active", "confirmed_at"],
            Model::Role => &["id", "name", "description"],
        }
    }

    /// Current records, ordered by id
    pub async fn rows(&self, auth: &AuthManager) -> Vec<Row> {
        let values: Vec<Value> = match self {
            Model::User => auth
                .user_manager()
                .list_users()
                .await
                .into_iter()
                .map(|user| {
                    json!({
                        "id": user.id,
                        "email": user.email,
                        "active": user.active,
                        "confirmed_at": user.confirmed_at,
                    })
                })
                .collect(),
            Model::Role => auth
                .role_manager()
                .list_roles()
                .await
                .into_iter()
                .map(|role| {
                    json!({
                        "id": role.id,
                        "name": role.name,
                        "description": role.description,
                    })
                })
                .collect(),
        };

        values
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect()
    }
}

/// Options handed through to [`BaseView`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseViewOptions {
    /// Display name, defaults to the model name
    pub name: Option<String>,

    /// Route segment, defaults to the lowercased model name
    pub endpoint: Option<String>,

    /// Menu category
    pub category: Option<String>,

    /// Anything else a view wants to carry
    pub extra: BTreeMap<String, Value>,
}

/// List settings a model view may override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelViewConfig {
    /// Columns shown in the list, defaults to every model column
    pub column_list: Option<Vec<String>>,

    /// Columns matched by the search box
    pub column_searchable_list: Option<Vec<String>>,

    /// Template rendering the list
    pub list_template: Option<String>,

    /// Columns accepting `flt_<column>` filters
    pub column_filters: Option<Vec<String>>,

    /// Passed unchanged to the base view
    pub base: BaseViewOptions,
}

/// Generic view identity shared by every admin view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseView {
    pub name: String,
    pub endpoint: String,
    pub category: Option<String>,
    pub extra: BTreeMap<String, Value>,
}

impl BaseView {
    pub fn new(model: Model, options: BaseViewOptions) -> Self {
        Self {
            name: options.name.unwrap_or_else(|| model.name().to_string()),
            endpoint: options
                .endpoint
                .unwrap_or_else(|| model.name().to_lowercase()),
            category: options.category,
            extra: options.extra,
        }
    }
}

/// Parsed list query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    /// Read `search` and the `flt_<column>` parameters for allowed columns
    pub fn from_params(params: &HashMap<String, String>, allowed_filters: &[String]) -> Self {
        let search = params
            .get(SEARCH_PARAM)
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());

        let filters = params
            .iter()
            .filter_map(|(key, value)| {
                let column = key.strip_prefix(FILTER_PREFIX)?;
                if allowed_filters.iter().any(|allowed| allowed == column) {
                    Some((column.to_string(), value.clone()))
                } else {
                    debug!("Ignoring filter on unlisted column: {}", column);
                    None
                }
            })
            .collect();

        Self { search, filters }
    }
}

/// Rendered list context
#[derive(Debug, Clone, Serialize)]
pub struct ListPage {
    pub template: String,
    pub base_template: String,
    pub name: String,
    pub endpoint: String,
    pub category: Option<String>,
    pub columns: Vec<String>,
    pub searchable: Vec<String>,
    pub filters: Vec<String>,
    pub search: Option<String>,
    pub active_filters: BTreeMap<String, String>,
    pub count: usize,
    pub rows: Vec<Row>,
    pub messages: Vec<FlashMessage>,
}

/// Admin view over one model
#[derive(Debug, Clone)]
pub struct ModelView {
    model: Model,
    base: BaseView,
    column_list: Vec<String>,
    column_searchable_list: Vec<String>,
    list_template: String,
    column_filters: Vec<String>,
    policy: AccessPolicy,
    extra_routes: Option<RouteFactory>,
}

impl ModelView {
    /// Create a view, taking the list settings from `config`
    pub fn new(model: Model, config: ModelViewConfig) -> Self {
        let ModelViewConfig {
            column_list,
            column_searchable_list,
            list_template,
            column_filters,
            base,
        } = config;

        Self {
            model,
            base: BaseView::new(model, base),
            column_list: column_list.unwrap_or_else(|| {
                model.columns().iter().map(|c| c.to_string()).collect()
            }),
            column_searchable_list: column_searchable_list.unwrap_or_default(),
            list_template: list_template.unwrap_or_else(|| DEFAULT_LIST_TEMPLATE.to_string()),
            column_filters: column_filters.unwrap_or_default(),
            policy: AccessPolicy::ModelView,
            extra_routes: None,
        }
    }

    /// Attach extra routes mounted below the view
    pub fn with_routes(mut self, factory: RouteFactory) -> Self {
        self.extra_routes = Some(factory);
        self
    }

    /// Guard the view with another policy
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn base(&self) -> &BaseView {
        &self.base
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn endpoint(&self) -> &str {
        &self.base.endpoint
    }

    pub fn column_list(&self) -> &[String] {
        &self.column_list
    }

    pub fn column_searchable_list(&self) -> &[String] {
        &self.column_searchable_list
    }

    pub fn list_template(&self) -> &str {
        &self.list_template
    }

    pub fn column_filters(&self) -> &[String] {
        &self.column_filters
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    pub fn extra_routes(&self) -> Option<RouteFactory> {
        self.extra_routes
    }

    /// Whether the actor may use this view
    pub fn is_accessible(&self, auth: &AuthManager, actor: &Actor) -> bool {
        auth.gate(self.policy).is_accessible(actor)
    }

    /// Reject actors the view's gate denies
    pub fn ensure_accessible(&self, auth: &AuthManager, actor: &Actor) -> ApiResult<()> {
        if self.is_accessible(auth, actor) {
            return Ok(());
        }

        warn!(
            view = %self.base.endpoint,
            policy = %self.policy,
            user_id = ?actor.user_id,
            "Access to model view denied"
        );
        Err(ApiError::Forbidden(format!(
            "Access to '{}' is not allowed",
            self.base.name
        )))
    }

    /// Search, filter and project rows to the listed columns
    pub fn apply(&self, rows: Vec<Row>, query: &ListQuery) -> Vec<Row> {
        let needle = query
            .search
            .as_ref()
            .filter(|_| !self.column_searchable_list.is_empty())
            .map(|term| term.to_lowercase());

        rows.into_iter()
            .filter(|row| match &needle {
                Some(needle) => self
                    .column_searchable_list
                    .iter()
                    .any(|column| cell_text(row.get(column)).to_lowercase().contains(needle)),
                None => true,
            })
            .filter(|row| {
                query
                    .filters
                    .iter()
                    .all(|(column, value)| cell_text(row.get(column)) == *value)
            })
            .map(|row| {
                self.column_list
                    .iter()
                    .map(|column| {
                        (
                            column.clone(),
                            row.get(column).cloned().unwrap_or(Value::Null),
                        )
                    })
                    .collect()
            })
            .collect()
    }

    /// Build the list page for an actor
    pub async fn render_list(
        &self,
        state: &AppState,
        actor: &Actor,
        params: &HashMap<String, String>,
    ) -> ApiResult<ListPage> {
        self.ensure_accessible(&state.auth, actor)?;

        let query = ListQuery::from_params(params, &self.column_filters);
        let rows = self.apply(self.model.rows(&state.auth).await, &query);
        debug!(view = %self.base.endpoint, count = rows.len(), "Listing rows");

        Ok(ListPage {
            template: self.list_template.clone(),
            base_template: state.admin.base_template().to_string(),
            name: self.base.name.clone(),
            endpoint: self.base.endpoint.clone(),
            category: self.base.category.clone(),
            columns: self.column_list.clone(),
            searchable: self.column_searchable_list.clone(),
            filters: self.column_filters.clone(),
            search: query.search,
            active_filters: query.filters,
            count: rows.len(),
            rows,
            messages: state.flash.drain(&FlashStore::key_for(actor)),
        })
    }
}

/// Text form of a cell used for searching and filtering
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_row(id: u64, email: &str, active: bool) -> Row {
        match json!({ "id": id, "email": email, "active": active, "confirmed_at": null }) {
            Value::Object(row) => row,
            _ => unreachable!(),
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            user_row(1, "umutcan@umutcan", true),
            user_row(2, "deneme", true),
            user_row(3, "Someone@Example.com", false),
        ]
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn user_view() -> ModelView {
        ModelView::new(
            Model::User,
            ModelViewConfig {
                column_list: Some(strings(&["id", "email", "active"])),
                column_searchable_list: Some(strings(&["email"])),
                list_template: Some("user_list.html".to_string()),
                column_filters: Some(strings(&["id", "email", "active"])),
                ..ModelViewConfig::default()
            },
        )
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_from_model() {
        let view = ModelView::new(Model::Role, ModelViewConfig::default());
        assert_eq!(view.name(), "Role");
        assert_eq!(view.endpoint(), "role");
        assert_eq!(view.column_list(), strings(&["id", "name", "description"]));
        assert_eq!(view.list_template(), DEFAULT_LIST_TEMPLATE);
        assert!(view.column_searchable_list().is_empty());
        assert!(view.column_filters().is_empty());
        assert_eq!(view.policy(), AccessPolicy::ModelView);
    }

    #[test]
    fn test_recognised_settings_are_taken() {
        let view = user_view();
        assert_eq!(view.column_list(), strings(&["id", "email", "active"]));
        assert_eq!(view.list_template(), "user_list.html");
        assert_eq!(view.column_searchable_list(), strings(&["email"]));
        assert_eq!(view.column_filters(), strings(&["id", "email", "active"]));
    }

    #[test]
    fn test_base_options_pass_through() {
        let mut extra = BTreeMap::new();
        extra.insert("menu_icon".to_string(), json!("fa-user"));

        let view = ModelView::new(
            Model::User,
            ModelViewConfig {
                base: BaseViewOptions {
                    name: Some("People".to_string()),
                    endpoint: Some("people".to_string()),
                    category: Some("Accounts".to_string()),
                    extra: extra.clone(),
                },
                ..ModelViewConfig::default()
            },
        );

        assert_eq!(view.name(), "People");
        assert_eq!(view.endpoint(), "people");
        assert_eq!(view.base().category.as_deref(), Some("Accounts"));
        assert_eq!(view.base().extra, extra);
    }

    #[test]
    fn test_projection_to_column_list() {
        let listed = user_view().apply(rows(), &ListQuery::default());
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].len(), 3);
        assert!(!listed[0].contains_key("confirmed_at"));

        let keys: Vec<&str> = listed[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "email", "active"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let view = user_view();
        let query = ListQuery::from_params(&params(&[("search", "EXAMPLE")]), view.column_filters());
        let listed = view.apply(rows(), &query);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], json!(3));
    }

    #[test]
    fn test_search_ignored_without_searchable_columns() {
        let view = ModelView::new(Model::User, ModelViewConfig::default());
        let query = ListQuery::from_params(&params(&[("search", "nobody")]), view.column_filters());
        assert_eq!(view.apply(rows(), &query).len(), 3);
    }

    #[test]
    fn test_filters_match_exactly() {
        let view = user_view();

        let query = ListQuery::from_params(&params(&[("flt_active", "false")]), view.column_filters());
        assert_eq!(view.apply(rows(), &query).len(), 1);

        let query = ListQuery::from_params(&params(&[("flt_email", "demo")]), view.column_filters());
        assert!(view.apply(rows(), &query).is_empty());

        let query = ListQuery::from_params(
            &params(&[("flt_id", "2"), ("flt_email", "deneme")]),
            view.column_filters(),
        );
        assert_eq!(view.apply(rows(), &query).len(), 1);
    }

    #[test]
    fn test_unlisted_filters_ignored() {
        let view = user_view();
        let query = ListQuery::from_params(
            &params(&[("flt_confirmed_at", "x"), ("page", "2")]),
            view.column_filters(),
        );
        assert!(query.filters.is_empty());
        assert_eq!(view.apply(rows(), &query).len(), 3);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(None), "");
        assert_eq!(cell_text(Some(&Value::Null)), "");
        assert_eq!(cell_text(Some(&json!("a"))), "a");
        assert_eq!(cell_text(Some(&json!(true))), "true");
        assert_eq!(cell_text(Some(&json!(12))), "12");
    }
}
