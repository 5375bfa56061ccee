// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Zapline assistant backend.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Zapline configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to the caps
/// the messaging platform policy assumes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ZaplineConfig {
    /// 24-hour messaging window settings.
    #[serde(default)]
    pub window: WindowConfig,

    /// Campaign dispatch and retention settings.
    #[serde(default)]
    pub campaign: CampaignConfig,
}

/// Settings for the engagement window tracker.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
    /// Length of the messaging window opened by an inbound message.
    #[serde(default = "default_window_hours")]
    pub window_hours: u64,

    /// Cap on reachable-set scans during campaign partitioning.
    #[serde(default = "default_reachable_scan_cap")]
    pub reachable_scan_cap: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_hours: default_window_hours(),
            reachable_scan_cap: default_reachable_scan_cap(),
        }
    }
}

/// Settings for campaign storage and dispatch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignConfig {
    /// How many recent campaign ids the global list retains.
    #[serde(default = "default_list_cap")]
    pub list_cap: usize,

    /// Maximum entries in a campaign's delivery-error log.
    #[serde(default = "default_error_log_cap")]
    pub error_log_cap: usize,

    /// Error messages are truncated to this many characters before logging.
    #[serde(default = "default_error_truncate_chars")]
    pub error_truncate_chars: usize,

    /// Best-effort TTL applied to per-campaign keys.
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,

    /// Upper bound for a single campaign-list page.
    #[serde(default = "default_list_page_cap")]
    pub list_page_cap: usize,

    /// Upper bound on users attempted in one manual reprocess sweep.
    #[serde(default = "default_reprocess_cap")]
    pub reprocess_cap: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            list_cap: default_list_cap(),
            error_log_cap: default_error_log_cap(),
            error_truncate_chars: default_error_truncate_chars(),
            retention_days: default_retention_days(),
            list_page_cap: default_list_page_cap(),
            reprocess_cap: default_reprocess_cap(),
        }
    }
}

fn default_window_hours() -> u64 {
    24
}

fn default_reachable_scan_cap() -> usize {
    20_000
}

fn default_list_cap() -> usize {
    300
}

fn default_error_log_cap() -> usize {
    200
}

fn default_error_truncate_chars() -> usize {
    500
}

fn default_retention_days() -> u64 {
    45
}

fn default_list_page_cap() -> usize {
    200
}

fn default_reprocess_cap() -> usize {
    20_000
}
