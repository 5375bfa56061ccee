// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User directory capability (known users and their subscription plans).

use async_trait::async_trait;

use crate::error::ZaplineError;
use crate::types::UserId;

/// Enumerates known users and resolves their billing plan codes.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Every user the system has ever seen an inbound message from.
    async fn list_known_users(&self) -> Result<Vec<UserId>, ZaplineError>;

    /// The user's current plan code, if any. Lookup failures are per-user
    /// and never abort audience resolution.
    async fn plan_code(&self, user: &UserId) -> Result<Option<String>, ZaplineError>;
}
