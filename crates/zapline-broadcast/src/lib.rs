// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Window-aware campaign dispatch for the Zapline assistant backend.
//!
//! A campaign is a one-time broadcast of a fixed text to a plan-filtered
//! audience, partitioned at creation into immediately-reachable recipients
//! (delivered inline) and pending recipients (delivered later by the
//! reconciliation sweeps once they re-enter the 24-hour window).

pub mod audience;
pub mod dispatcher;
pub mod reconcile;

pub use dispatcher::{CampaignDispatcher, DispatchSummary};
pub use reconcile::{InboundOutcome, Reconciler, ReprocessOutcome, SweepOutcome};
