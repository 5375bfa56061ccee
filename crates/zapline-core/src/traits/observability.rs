// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observability sink capability for campaign lifecycle events.

use async_trait::async_trait;

/// Fire-and-forget event emission.
///
/// Implementations must swallow their own failures; emitting an event can
/// never block or fail the operation that produced it.
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    async fn emit(&self, event: &str, payload: serde_json::Value);
}
