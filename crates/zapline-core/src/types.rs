// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Zapline workspace.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Far-future millisecond timestamp used as the upper bound of open-ended
/// score range queries where the store has no true "+infinity".
pub const FAR_FUTURE_MS: i64 = 32_503_680_000_000;

/// Current wall-clock time in unix milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Identifier of a WhatsApp user (the platform-level recipient id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Pattern for campaign ids: creation millis plus an 8-hex random suffix.
static CAMPAIGN_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10,16}-[0-9a-f]{8}$").expect("valid campaign id pattern"));

/// Unique, time-ordered identifier of a broadcast campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

impl CampaignId {
    /// Mint a fresh id from the creation timestamp plus a random suffix.
    /// Ids sort chronologically and are never reused.
    pub fn generate(created_at_ms: i64) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{created_at_ms}-{}", &suffix[..8]))
    }

    /// Whether a raw string is a well-formed campaign id.
    pub fn is_well_formed(raw: &str) -> bool {
        CAMPAIGN_ID.is_match(raw)
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Delivery mode of a campaign. Only plain text is supported today.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CampaignMode {
    #[default]
    Text,
}

/// Request payload for creating a campaign.
#[derive(Debug, Clone, Default)]
pub struct CampaignDraft {
    pub subject: String,
    pub text: String,
    /// Raw plan codes to target; normalized and filtered before use.
    /// Empty means the campaign targets every known user.
    pub plan_targets: Vec<String>,
    pub mode: CampaignMode,
}

/// Immutable campaign metadata, written once at creation.
///
/// `text` is never mutated after creation; reconciliation depends on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMeta {
    pub id: CampaignId,
    pub created_at_ms: i64,
    pub subject: String,
    #[serde(default)]
    pub mode: CampaignMode,
    #[serde(default)]
    pub plan_targets: Vec<String>,
    /// The broadcast body. A persisted meta with an empty text is treated
    /// as corrupted and its pending entries as permanently unsendable.
    #[serde(default)]
    pub text: String,
}

/// Live counters for a campaign, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub sent: u64,
    pub pending: u64,
    pub errors: u64,
}

/// A campaign together with its current stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub meta: CampaignMeta,
    pub stats: CampaignStats,
}

/// One entry in a campaign's bounded delivery-error log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryErrorEntry {
    pub ts_ms: i64,
    pub user: UserId,
    pub error: String,
}

/// Result of refreshing a user's 24-hour messaging window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTouch {
    pub user: UserId,
    pub last_inbound_at_ms: i64,
    pub window_ends_at_ms: i64,
}
