// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending reconciliation: retrying delivery to users who were out of
//! window when their campaign was created.
//!
//! Two triggers: a manual sweep over one campaign's pending set, and an
//! automatic single-user sweep across all campaigns with outstanding
//! pending entries, run whenever that user re-enters the window. The
//! single-user sweep scans the global pending-campaign index rather than a
//! per-user reverse index; the backlog of campaigns with pending members is
//! expected to stay small.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use zapline_config::ZaplineConfig;
use zapline_core::types::{CampaignId, DeliveryErrorEntry, UserId, WindowTouch, now_ms};
use zapline_core::{EventSink, MessageTransport, ZaplineError};
use zapline_engage::WindowTracker;
use zapline_store::CampaignRepository;

/// Result of a manual single-campaign sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReprocessOutcome {
    pub pending_before: usize,
    pub attempted: usize,
    pub sent: usize,
    pub errors: usize,
    pub pending_after: usize,
}

/// Result of the automatic per-user sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Campaigns where a state change occurred (delivery or stale removal).
    pub processed: usize,
}

/// Result of handling one inbound message end to end.
#[derive(Debug, Clone)]
pub struct InboundOutcome {
    pub touch: WindowTouch,
    pub sweep: SweepOutcome,
}

/// Drains pending campaign recipients back within the messaging window.
#[derive(Clone)]
pub struct Reconciler {
    campaigns: CampaignRepository,
    tracker: WindowTracker,
    transport: Arc<dyn MessageTransport>,
    events: Arc<dyn EventSink>,
    reprocess_cap: usize,
}

impl Reconciler {
    pub fn new(
        campaigns: CampaignRepository,
        tracker: WindowTracker,
        transport: Arc<dyn MessageTransport>,
        events: Arc<dyn EventSink>,
        config: &ZaplineConfig,
    ) -> Self {
        Self {
            campaigns,
            tracker,
            transport,
            events,
            reprocess_cap: config.campaign.reprocess_cap,
        }
    }

    /// Manual sweep: attempt delivery to every pending recipient of one
    /// campaign who is currently reachable.
    ///
    /// Unlike creation-time immediate sends, a failure here leaves the user
    /// in the pending set for a future attempt.
    pub async fn reprocess(
        &self,
        id: &CampaignId,
        limit: usize,
    ) -> Result<ReprocessOutcome, ZaplineError> {
        if !CampaignId::is_well_formed(&id.0) {
            return Err(ZaplineError::InvalidArgument(format!(
                "malformed campaign id: {id}"
            )));
        }

        let meta = match self.campaigns.meta(id).await? {
            Some(meta) if !meta.text.is_empty() => meta,
            other => {
                // Corrupted or incomplete campaign: report, touch nothing.
                error!(
                    campaign = %id,
                    missing_meta = other.is_none(),
                    "campaign unusable for reprocess; returning zero-effect outcome"
                );
                return Ok(ReprocessOutcome::default());
            }
        };

        let now = now_ms();
        let limit = limit.min(self.reprocess_cap);
        let pending = self.campaigns.pending_members(id).await?;
        let pending_before = pending.len();
        let reachable: HashSet<UserId> = self
            .tracker
            .list_reachable(now, limit)
            .await?
            .into_iter()
            .collect();

        let attempted: Vec<UserId> = pending
            .into_iter()
            .filter(|user| reachable.contains(user))
            .collect();

        let mut sent = 0;
        let mut errors = 0;
        for user in &attempted {
            match self.transport.send_text(user, &meta.text).await {
                Ok(()) => {
                    self.campaigns.mark_sent(id, user).await?;
                    self.campaigns.remove_pending(id, user).await?;
                    sent += 1;
                }
                Err(err) => {
                    errors += 1;
                    self.campaigns
                        .log_error(
                            id,
                            DeliveryErrorEntry {
                                ts_ms: now_ms(),
                                user: user.clone(),
                                error: err.to_string(),
                            },
                        )
                        .await;
                    warn!(campaign = %id, user = %user, error = %err, "reprocess send failed; user stays pending");
                }
            }
        }

        let pending_after = self.campaigns.sync_pending_index(id).await? as usize;

        let outcome = ReprocessOutcome {
            pending_before,
            attempted: attempted.len(),
            sent,
            errors,
            pending_after,
        };
        self.events
            .emit(
                "campaign.reprocessed",
                json!({
                    "id": id.0,
                    "pending_before": outcome.pending_before,
                    "attempted": outcome.attempted,
                    "sent": outcome.sent,
                    "errors": outcome.errors,
                    "pending_after": outcome.pending_after,
                }),
            )
            .await;
        info!(
            campaign = %id,
            pending_before = outcome.pending_before,
            attempted = outcome.attempted,
            sent = outcome.sent,
            errors = outcome.errors,
            pending_after = outcome.pending_after,
            "campaign reprocessed"
        );
        Ok(outcome)
    }

    /// Automatic sweep for one user who just re-entered the window: scan
    /// every campaign with outstanding pending entries and deliver the ones
    /// this user is still owed.
    ///
    /// Per-campaign delivery failures are logged and left pending; the sweep
    /// always continues to the next campaign.
    pub async fn auto_sweep_for_user(&self, user: &UserId) -> Result<SweepOutcome, ZaplineError> {
        let candidates = self.campaigns.pending_campaigns().await?;
        let mut processed = 0;

        for id in candidates {
            if !self.campaigns.is_pending(&id, user).await? {
                continue;
            }

            match self.campaigns.meta(&id).await? {
                Some(meta) if !meta.text.is_empty() => {
                    match self.transport.send_text(user, &meta.text).await {
                        Ok(()) => {
                            self.campaigns.mark_sent(&id, user).await?;
                            self.campaigns.remove_pending(&id, user).await?;
                            processed += 1;
                        }
                        Err(err) => {
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
                            warn!(campaign = %id, user = %user, error = %err, "auto-sweep send failed; user stays pending");
                        }
                    }
                }
                other => {
                    // Permanently unsendable stale entry: the campaign lost
                    // its text, so drop the user from pending and move on.
                    self.campaigns.remove_pending(&id, user).await?;
                    self.campaigns
                        .log_error(
                            &id,
                            DeliveryErrorEntry {
                                ts_ms: now_ms(),
                                user: user.clone(),
                                error: "campaign metadata missing text; pending entry dropped"
                                    .into(),
                            },
                        )
                        .await;
                    error!(
                        campaign = %id,
                        user = %user,
                        missing_meta = other.is_none(),
                        "stale pending entry removed from corrupted campaign"
                    );
                    processed += 1;
                }
            }

            self.campaigns.sync_pending_index(&id).await?;
        }

        Ok(SweepOutcome { processed })
    }

    /// Handle one inbound message: refresh the user's window, then run the
    /// automatic pending sweep for them.
    pub async fn handle_inbound(
        &self,
        user: &UserId,
        at_ms: i64,
    ) -> Result<InboundOutcome, ZaplineError> {
        let touch = self.tracker.touch(user, at_ms).await?;
        let sweep = self.auto_sweep_for_user(user).await?;
        Ok(InboundOutcome { touch, sweep })
    }
}
