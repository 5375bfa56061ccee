// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock user directory with scriptable plan-lookup failures.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use zapline_core::types::UserId;
use zapline_core::{UserDirectory, ZaplineError};

/// A mock user directory for testing audience resolution.
#[derive(Default)]
pub struct MockDirectory {
    users: Mutex<Vec<UserId>>,
    plans: Mutex<HashMap<String, String>>,
    failing_lookups: Mutex<HashSet<String>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a known user, optionally with a plan code.
    pub async fn add_user(&self, user: &UserId, plan: Option<&str>) {
        self.users.lock().await.push(user.clone());
        if let Some(plan) = plan {
            self.plans
                .lock()
                .await
                .insert(user.0.clone(), plan.to_string());
        }
    }

    /// Make plan lookups for this user fail.
    pub async fn fail_plan_lookup(&self, user: &UserId) {
        self.failing_lookups.lock().await.insert(user.0.clone());
    }
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn list_known_users(&self) -> Result<Vec<UserId>, ZaplineError> {
        Ok(self.users.lock().await.clone())
    }

    async fn plan_code(&self, user: &UserId) -> Result<Option<String>, ZaplineError> {
        if self.failing_lookups.lock().await.contains(&user.0) {
            return Err(ZaplineError::store(std::io::Error::other(
                "mock plan lookup failure",
            )));
        }
        Ok(self.plans.lock().await.get(&user.0).cloned())
    }
}
