//! SPDX-FileCopyrightText: © 2025 Cory Parent <goedelsoup+orasi@goedelsoup.io>
//! SPDX-License-Identifier: Apache-2.0
//!

//! One-shot flash messages

use admin_auth::Actor;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Queue key used for actors without a stored user
pub const ANONYMOUS_KEY: &str = "anonymous";

/// Default message category
pub const DEFAULT_CATEGORY: &str = "message";

/// A message shown once on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: String,
    pub message: String,
}

/// Per-session flash queues
#[derive(Debug, Clone, Default)]
pub struct FlashStore {
    queues: Arc<DashMap<String, Vec<FlashMessage>>>,
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue key for an actor
    pub fn key_for(actor: &Actor) -> String {
        match actor.user_id {
            Some(user_id) => user_id.to_string(),
            None => ANONYMOUS_KEY.to_string(),
        }
    }

    /// Queue a message in the default category
    pub fn push(&self, key: &str, message: impl Into<String>) {
        self.push_with_category(key, DEFAULT_CATEGORY, message);
    }

    pub fn push_with_category(
        &self,
        key: &str,
        category: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.queues
            .entry(key.to_string())
            .or_default()
            .push(FlashMessage {
                category: category.into(),
                message: message.into(),
            });
    }

    /// Take every pending message for a key, oldest first
    pub fn drain(&self, key: &str) -> Vec<FlashMessage> {
        self.queues
            .remove(key)
            .map(|(_, messages)| messages)
            .unwrap_or_default()
    }

    /// Number of pending messages for a key
    pub fn pending(&self, key: &str) -> usize {
        self.queues.get(key).map(|queue| queue.len()).unwrap_or(0)
    }
}
