// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key construction for every durable-store entry Zapline owns.
//!
//! All key strings are built here and nowhere else, so the namespace can be
//! audited in one place.

use zapline_core::types::{CampaignId, UserId};

/// Sorted set: user id -> window-expiry millis.
pub const WINDOW_INDEX: &str = "window:index";

/// Set of every user id an inbound message was ever seen from.
pub const KNOWN_USERS: &str = "users:known";

/// List of recent campaign ids, newest first, capped.
pub const RECENT_CAMPAIGNS: &str = "campaigns:recent";

/// Set of campaign ids that still have at least one pending recipient.
pub const PENDING_CAMPAIGNS: &str = "campaigns:pending";

/// String: the user's last inbound timestamp in millis.
pub fn window_last(user: &UserId) -> String {
    format!("window:last:{user}")
}

/// String: immutable campaign metadata as JSON.
pub fn campaign_meta(id: &CampaignId) -> String {
    format!("campaign:meta:{id}")
}

/// Set of user ids already delivered for the campaign.
pub fn campaign_sent(id: &CampaignId) -> String {
    format!("campaign:sent:{id}")
}

/// Set of user ids targeted but not yet delivered.
pub fn campaign_pending(id: &CampaignId) -> String {
    format!("campaign:pending:{id}")
}

/// List of delivery-error entries as JSON, newest first, capped.
pub fn campaign_errors(id: &CampaignId) -> String {
    format!("campaign:errors:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_embed_identifiers() {
        let user = UserId("5511999990000".into());
        let id = CampaignId("1700000000000-00ff00ff".into());

        assert_eq!(window_last(&user), "window:last:5511999990000");
        assert_eq!(campaign_meta(&id), "campaign:meta:1700000000000-00ff00ff");
        assert_eq!(campaign_sent(&id), "campaign:sent:1700000000000-00ff00ff");
        assert_eq!(
            campaign_pending(&id),
            "campaign:pending:1700000000000-00ff00ff"
        );
        assert_eq!(
            campaign_errors(&id),
            "campaign:errors:1700000000000-00ff00ff"
        );
    }
}
