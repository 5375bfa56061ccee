// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository for campaign state: metadata, sent/pending sets, the bounded
//! error log, and the global recent/pending indexes.

use std::sync::Arc;

use tracing::warn;

use zapline_config::CampaignConfig;
use zapline_core::types::{CampaignId, CampaignMeta, DeliveryErrorEntry, UserId};
use zapline_core::{DurableStore, ZaplineError};

use crate::keys;

/// Typed access to every per-campaign structure plus the global indexes.
#[derive(Clone)]
pub struct CampaignRepository {
    store: Arc<dyn DurableStore>,
    list_cap: usize,
    error_log_cap: usize,
    error_truncate_chars: usize,
    retention_secs: u64,
}

impl CampaignRepository {
    pub fn new(store: Arc<dyn DurableStore>, config: &CampaignConfig) -> Self {
        Self {
            store,
            list_cap: config.list_cap,
            error_log_cap: config.error_log_cap,
            error_truncate_chars: config.error_truncate_chars,
            retention_secs: config.retention_days * 24 * 3600,
        }
    }

    /// Persist campaign metadata. Written once at creation, never rewritten.
    pub async fn put_meta(&self, meta: &CampaignMeta) -> Result<(), ZaplineError> {
        let json = serde_json::to_string(meta)
            .map_err(|e| ZaplineError::Internal(format!("campaign meta encode: {e}")))?;
        self.store.set(&keys::campaign_meta(&meta.id), &json).await
    }

    /// Load campaign metadata. An unparsable record is reported as absent
    /// after a warning; callers treat it like a missing campaign.
    pub async fn meta(&self, id: &CampaignId) -> Result<Option<CampaignMeta>, ZaplineError> {
        let Some(raw) = self.store.get(&keys::campaign_meta(id)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(meta) => Ok(Some(meta)),
            Err(err) => {
                warn!(campaign = %id, error = %err, "unparsable campaign meta");
                Ok(None)
            }
        }
    }

    /// Register a freshly created campaign in the recent list, evicting the
    /// oldest beyond the cap.
    pub async fn push_recent(&self, id: &CampaignId) -> Result<(), ZaplineError> {
        self.store.l_push(keys::RECENT_CAMPAIGNS, &id.0).await?;
        self.store
            .l_trim(keys::RECENT_CAMPAIGNS, 0, self.list_cap as i64 - 1)
            .await
    }

    /// Most recent campaign ids, newest first.
    pub async fn recent_ids(&self, limit: usize) -> Result<Vec<CampaignId>, ZaplineError> {
        let raw = self
            .store
            .l_range(keys::RECENT_CAMPAIGNS, 0, limit as i64 - 1)
            .await?;
        Ok(raw.into_iter().map(CampaignId).collect())
    }

    /// Record a delivered recipient. Duplicate adds are no-ops.
    pub async fn mark_sent(&self, id: &CampaignId, user: &UserId) -> Result<(), ZaplineError> {
        self.store
            .s_add(&keys::campaign_sent(id), std::slice::from_ref(&user.0))
            .await?;
        Ok(())
    }

    /// Bulk-register recipients deferred at creation time. The pending set
    /// only ever grows here; afterwards it can only shrink.
    pub async fn add_pending(&self, id: &CampaignId, users: &[UserId]) -> Result<(), ZaplineError> {
        if users.is_empty() {
            return Ok(());
        }
        let members: Vec<String> = users.iter().map(|u| u.0.clone()).collect();
        self.store
            .s_add(&keys::campaign_pending(id), &members)
            .await?;
        Ok(())
    }

    pub async fn remove_pending(&self, id: &CampaignId, user: &UserId) -> Result<(), ZaplineError> {
        self.store
            .s_rem(&keys::campaign_pending(id), &user.0)
            .await?;
        Ok(())
    }

    pub async fn is_pending(&self, id: &CampaignId, user: &UserId) -> Result<bool, ZaplineError> {
        self.store
            .s_is_member(&keys::campaign_pending(id), &user.0)
            .await
    }

    pub async fn pending_members(&self, id: &CampaignId) -> Result<Vec<UserId>, ZaplineError> {
        let raw = self.store.s_members(&keys::campaign_pending(id)).await?;
        Ok(raw.into_iter().map(UserId).collect())
    }

    pub async fn sent_count(&self, id: &CampaignId) -> Result<u64, ZaplineError> {
        self.store.s_card(&keys::campaign_sent(id)).await
    }

    pub async fn pending_count(&self, id: &CampaignId) -> Result<u64, ZaplineError> {
        self.store.s_card(&keys::campaign_pending(id)).await
    }

    /// Append to the campaign's bounded error log, truncating the message
    /// and evicting the oldest entries beyond the cap. The log is advisory
    /// state, so store failures are swallowed with a warning.
    pub async fn log_error(&self, id: &CampaignId, mut entry: DeliveryErrorEntry) {
        if entry.error.chars().count() > self.error_truncate_chars {
            entry.error = entry.error.chars().take(self.error_truncate_chars).collect();
        }
        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(err) => {
                warn!(campaign = %id, error = %err, "delivery error entry encode failed");
                return;
            }
        };
        let key = keys::campaign_errors(id);
        if let Err(err) = self.store.l_push(&key, &json).await {
            warn!(campaign = %id, error = %err, "delivery error log append failed");
            return;
        }
        if let Err(err) = self
            .store
            .l_trim(&key, 0, self.error_log_cap as i64 - 1)
            .await
        {
            warn!(campaign = %id, error = %err, "delivery error log trim failed");
        }
    }

    /// Bounded error count: a range read over the capped log, not a true
    /// unbounded count.
    pub async fn error_count(&self, id: &CampaignId) -> Result<u64, ZaplineError> {
        let entries = self
            .store
            .l_range(&keys::campaign_errors(id), 0, self.error_log_cap as i64 - 1)
            .await?;
        Ok(entries.len() as u64)
    }

    /// Recent error entries, newest first. Unparsable entries are skipped.
    pub async fn recent_errors(
        &self,
        id: &CampaignId,
        limit: usize,
    ) -> Result<Vec<DeliveryErrorEntry>, ZaplineError> {
        let raw = self
            .store
            .l_range(&keys::campaign_errors(id), 0, limit as i64 - 1)
            .await?;
        Ok(raw
            .iter()
            .filter_map(|json| serde_json::from_str(json).ok())
            .collect())
    }

    /// Campaign ids with at least one outstanding pending recipient.
    pub async fn pending_campaigns(&self) -> Result<Vec<CampaignId>, ZaplineError> {
        let raw = self.store.s_members(keys::PENDING_CAMPAIGNS).await?;
        Ok(raw.into_iter().map(CampaignId).collect())
    }

    /// Register a campaign as having outstanding pending recipients.
    pub async fn enlist_pending(&self, id: &CampaignId) -> Result<(), ZaplineError> {
        self.store
            .s_add(keys::PENDING_CAMPAIGNS, std::slice::from_ref(&id.0))
            .await?;
        Ok(())
    }

    /// Re-derive the campaign's membership in the global pending index from
    /// its live pending cardinality. Run after every pending mutation so the
    /// index self-heals from drift.
    pub async fn sync_pending_index(&self, id: &CampaignId) -> Result<u64, ZaplineError> {
        let remaining = self.pending_count(id).await?;
        if remaining == 0 {
            self.store.s_rem(keys::PENDING_CAMPAIGNS, &id.0).await?;
        } else {
            self.store
                .s_add(keys::PENDING_CAMPAIGNS, std::slice::from_ref(&id.0))
                .await?;
        }
        Ok(remaining)
    }

    /// Best-effort retention TTL over all per-campaign keys; campaigns are
    /// operational state, not permanent history. Failures are swallowed.
    pub async fn apply_retention(&self, id: &CampaignId) {
        for key in [
            keys::campaign_meta(id),
            keys::campaign_sent(id),
            keys::campaign_pending(id),
            keys::campaign_errors(id),
        ] {
            if let Err(err) = self.store.expire(&key, self.retention_secs).await {
                warn!(campaign = %id, key = %key, error = %err, "retention refresh failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zapline_core::types::CampaignMode;
    use zapline_test_utils::MemoryStore;

    fn repo_with(config: CampaignConfig) -> CampaignRepository {
        CampaignRepository::new(Arc::new(MemoryStore::new()), &config)
    }

    fn repo() -> CampaignRepository {
        repo_with(CampaignConfig::default())
    }

    fn meta(id: &str) -> CampaignMeta {
        CampaignMeta {
            id: CampaignId(id.into()),
            created_at_ms: 1_700_000_000_000,
            subject: "promo".into(),
            mode: CampaignMode::Text,
            plan_targets: vec!["PRO".into()],
            text: "hello".into(),
        }
    }

    #[tokio::test]
    async fn meta_round_trips() {
        let repo = repo();
        let meta = meta("1700000000000-00ff00ff");
        repo.put_meta(&meta).await.unwrap();

        let loaded = repo.meta(&meta.id).await.unwrap().unwrap();
        assert_eq!(loaded, meta);

        let missing = CampaignId("1700000000001-11ff11ff".into());
        assert!(repo.meta(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recent_list_is_capped_and_newest_first() {
        let repo = repo_with(CampaignConfig {
            list_cap: 3,
            ..CampaignConfig::default()
        });

        for i in 0..5 {
            repo.push_recent(&CampaignId(format!("170000000000{i}-00ff00ff")))
                .await
                .unwrap();
        }

        let ids = repo.recent_ids(10).await.unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0].0, "1700000000004-00ff00ff");
        assert_eq!(ids[2].0, "1700000000002-00ff00ff");
    }

    #[tokio::test]
    async fn sent_adds_are_idempotent() {
        let repo = repo();
        let id = CampaignId("1700000000000-00ff00ff".into());
        let user = UserId::from("u1");

        repo.mark_sent(&id, &user).await.unwrap();
        repo.mark_sent(&id, &user).await.unwrap();
        assert_eq!(repo.sent_count(&id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn pending_index_self_heals_in_both_directions() {
        let repo = repo();
        let id = CampaignId("1700000000000-00ff00ff".into());
        let user = UserId::from("u1");

        repo.add_pending(&id, std::slice::from_ref(&user))
            .await
            .unwrap();
        repo.enlist_pending(&id).await.unwrap();
        assert_eq!(repo.pending_campaigns().await.unwrap().len(), 1);

        repo.remove_pending(&id, &user).await.unwrap();
        assert_eq!(repo.sync_pending_index(&id).await.unwrap(), 0);
        assert!(repo.pending_campaigns().await.unwrap().is_empty());

        // Drift the other way: members present but index entry missing.
        repo.add_pending(&id, std::slice::from_ref(&user))
            .await
            .unwrap();
        assert_eq!(repo.sync_pending_index(&id).await.unwrap(), 1);
        assert_eq!(repo.pending_campaigns().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_log_truncates_and_caps() {
        let repo = repo_with(CampaignConfig {
            error_log_cap: 3,
            error_truncate_chars: 10,
            ..CampaignConfig::default()
        });
        let id = CampaignId("1700000000000-00ff00ff".into());

        for i in 0..5 {
            repo.log_error(
                &id,
                DeliveryErrorEntry {
                    ts_ms: i,
                    user: UserId(format!("u{i}")),
                    error: "x".repeat(50),
                },
            )
            .await;
        }

        assert_eq!(repo.error_count(&id).await.unwrap(), 3);
        let entries = repo.recent_errors(&id, 10).await.unwrap();
        assert_eq!(entries.len(), 3);
        // Newest first, oldest evicted.
        assert_eq!(entries[0].ts_ms, 4);
        assert_eq!(entries[2].ts_ms, 2);
        assert!(entries.iter().all(|e| e.error.chars().count() == 10));
    }
}
