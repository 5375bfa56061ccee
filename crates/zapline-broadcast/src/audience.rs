// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audience resolution: plan-target normalization and plan filtering.

use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::warn;

use zapline_core::types::UserId;
use zapline_core::{UserDirectory, ZaplineError};

/// Plan codes are short uppercase tokens.
static PLAN_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_]{3,40}$").expect("valid plan token pattern"));

/// Uppercase, validate, and dedupe raw plan targets. Invalid entries are
/// silently dropped; an empty result means no plan filter.
pub fn normalize_plan_targets(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|t| t.trim().to_ascii_uppercase())
        .filter(|t| PLAN_TOKEN.is_match(t))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve the target audience: every known user, optionally filtered to
/// those on one of the given (already normalized) plans.
///
/// A failed plan lookup skips that user; a single bad user read must never
/// abort campaign creation.
pub async fn resolve_audience(
    directory: &Arc<dyn UserDirectory>,
    plan_targets: &[String],
) -> Result<Vec<UserId>, ZaplineError> {
    let users = directory.list_known_users().await?;
    if plan_targets.is_empty() {
        return Ok(users);
    }

    let wanted: BTreeSet<&str> = plan_targets.iter().map(String::as_str).collect();
    let mut audience = Vec::new();
    for user in users {
        match directory.plan_code(&user).await {
            Ok(Some(code)) if wanted.contains(code.to_ascii_uppercase().as_str()) => {
                audience.push(user);
            }
            Ok(_) => {}
            Err(err) => {
                warn!(user = %user, error = %err, "plan lookup failed; skipping user");
            }
        }
    }
    Ok(audience)
}
