// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Zapline WhatsApp assistant backend.
//!
//! This crate provides the foundational error type, domain types, and the
//! capability traits for the external collaborators the engine consumes:
//! the durable store, the outbound message transport, the user directory,
//! and the observability sink.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ZaplineError;
pub use types::{
    CampaignDraft, CampaignId, CampaignMeta, CampaignMode, CampaignRecord, CampaignStats,
    DeliveryErrorEntry, UserId, WindowTouch,
};

pub use traits::{DurableStore, EventSink, MessageTransport, UserDirectory};
