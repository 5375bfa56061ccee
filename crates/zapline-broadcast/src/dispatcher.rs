// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign creation: audience partitioning, immediate dispatch, and
//! pending registration.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use zapline_config::ZaplineConfig;
use zapline_core::types::{
    CampaignDraft, CampaignId, CampaignMeta, CampaignRecord, CampaignStats, DeliveryErrorEntry,
    UserId, now_ms,
};
use zapline_core::{EventSink, MessageTransport, UserDirectory, ZaplineError};
use zapline_engage::WindowTracker;
use zapline_store::CampaignRepository;

use crate::audience::{normalize_plan_targets, resolve_audience};

/// Result of creating a campaign.
#[derive(Debug, Clone)]
pub struct DispatchSummary {
    pub meta: CampaignMeta,
    pub targeted: usize,
    pub sent: usize,
    pub pending: usize,
    pub errors: usize,
}

/// Creates campaigns and serves campaign reads.
#[derive(Clone)]
pub struct CampaignDispatcher {
    campaigns: CampaignRepository,
    tracker: WindowTracker,
    transport: Arc<dyn MessageTransport>,
    directory: Arc<dyn UserDirectory>,
    events: Arc<dyn EventSink>,
    reachable_scan_cap: usize,
    list_page_cap: usize,
}

impl CampaignDispatcher {
    pub fn new(
        campaigns: CampaignRepository,
        tracker: WindowTracker,
        transport: Arc<dyn MessageTransport>,
        directory: Arc<dyn UserDirectory>,
        events: Arc<dyn EventSink>,
        config: &ZaplineConfig,
    ) -> Self {
        Self {
            campaigns,
            tracker,
            transport,
            directory,
            events,
            reachable_scan_cap: config.window.reachable_scan_cap,
            list_page_cap: config.campaign.list_page_cap,
        }
    }

    /// Create a campaign: resolve the audience, partition it against the
    /// current reachable set, deliver to the reachable half inline, and
    /// persist the rest as pending for later reconciliation.
    pub async fn create(&self, draft: CampaignDraft) -> Result<DispatchSummary, ZaplineError> {
        if draft.subject.trim().is_empty() {
            return Err(ZaplineError::MissingField("subject"));
        }
        if draft.text.trim().is_empty() {
            return Err(ZaplineError::MissingField("text"));
        }

        let plan_targets = normalize_plan_targets(&draft.plan_targets);
        let audience = resolve_audience(&self.directory, &plan_targets).await?;

        let created_at_ms = now_ms();
        let reachable: HashSet<UserId> = self
            .tracker
            .list_reachable(created_at_ms, self.reachable_scan_cap)
            .await?
            .into_iter()
            .collect();

        let (send_now, pending): (Vec<UserId>, Vec<UserId>) = audience
            .iter()
            .cloned()
            .partition(|user| reachable.contains(user));

        let id = CampaignId::generate(created_at_ms);
        let meta = CampaignMeta {
            id: id.clone(),
            created_at_ms,
            subject: draft.subject,
            mode: draft.mode,
            plan_targets,
            text: draft.text,
        };
        self.campaigns.put_meta(&meta).await?;
        self.campaigns.push_recent(&id).await?;

        let mut sent = 0;
        let mut errors = 0;
        for user in &send_now {
            // Send happens-before record-as-sent, so an interruption can
            // never mark an unsent user as sent.
            match self.transport.send_text(user, &meta.text).await {
                Ok(()) => {
                    self.campaigns.mark_sent(&id, user).await?;
                    sent += 1;
                }
                Err(err) => {
                    // A failed immediate send is logged and dropped, not
                    // queued as pending; only the per-user auto-sweep can
                    // pick it up again.
                    errors += 1;
                    self.campaigns
                        .log_error(
                            &id,
                            DeliveryErrorEntry {
                                ts_ms: now_ms(),
                                user: user.clone(),
                                error: err.to_string(),
                            },
                        )
                        .await;
                    warn!(campaign = %id, user = %user, error = %err, "immediate send failed");
                }
            }
        }

        if !pending.is_empty() {
            self.campaigns.add_pending(&id, &pending).await?;
            self.campaigns.enlist_pending(&id).await?;
        }

        self.campaigns.apply_retention(&id).await;

        self.events
            .emit(
                "campaign.created",
                json!({
                    "id": id.0,
                    "subject": meta.subject.clone(),
                    "targeted": audience.len(),
                    "sent": sent,
                    "pending": pending.len(),
                    "errors": errors,
                }),
            )
            .await;
        info!(
            campaign = %id,
            targeted = audience.len(),
            sent,
            pending = pending.len(),
            errors,
            "campaign created"
        );

        Ok(DispatchSummary {
            meta,
            targeted: audience.len(),
            sent,
            pending: pending.len(),
            errors,
        })
    }

    /// Load one campaign with stats recomputed fresh from the live sets.
    pub async fn get(&self, id: &CampaignId) -> Result<Option<CampaignRecord>, ZaplineError> {
        if !CampaignId::is_well_formed(&id.0) {
            return Err(ZaplineError::InvalidArgument(format!(
                "malformed campaign id: {id}"
            )));
        }
        let Some(meta) = self.campaigns.meta(id).await? else {
            return Ok(None);
        };
        let stats = CampaignStats {
            sent: self.campaigns.sent_count(id).await?,
            pending: self.campaigns.pending_count(id).await?,
            errors: self.campaigns.error_count(id).await?,
        };
        Ok(Some(CampaignRecord { meta, stats }))
    }

    /// Most recent campaigns, newest first. Campaigns whose metadata fails
    /// to load are skipped.
    pub async fn list(&self, limit: usize) -> Result<Vec<CampaignRecord>, ZaplineError> {
        let limit = limit.min(self.list_page_cap);
        let ids = self.campaigns.recent_ids(limit).await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => warn!(campaign = %id, "listed campaign has no metadata"),
                Err(err) => warn!(campaign = %id, error = %err, "skipping unreadable campaign"),
            }
        }
        Ok(records)
    }
}
