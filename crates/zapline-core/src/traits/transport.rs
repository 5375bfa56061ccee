// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound message transport capability (the WhatsApp send API).

use async_trait::async_trait;

use crate::error::ZaplineError;
use crate::types::UserId;

/// Sends a free-form text message to a single recipient.
///
/// The transport distinguishes delivered from failed and nothing more; no
/// delivery receipts are modeled. No timeout is enforced here — a hang in
/// the implementation surfaces as a per-recipient failure only if the
/// implementation itself times out.
#[async_trait]
pub trait MessageTransport: Send + Sync + 'static {
    async fn send_text(&self, recipient: &UserId, text: &str) -> Result<(), ZaplineError>;
}
