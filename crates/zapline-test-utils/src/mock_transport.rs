// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound transport with scriptable per-recipient failures.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use zapline_core::types::UserId;
use zapline_core::{MessageTransport, ZaplineError};

/// A mock WhatsApp transport for testing.
///
/// Deliveries are captured for assertion; recipients registered via
/// [`fail_for`](Self::fail_for) reject every send until cleared.
#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<(UserId, String)>>,
    failing: Mutex<HashSet<String>>,
    failing_texts: Mutex<HashSet<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to this recipient fail until cleared.
    pub async fn fail_for(&self, user: &UserId) {
        self.failing.lock().await.insert(user.0.clone());
    }

    /// Make every send of this exact text fail, regardless of recipient.
    pub async fn fail_for_text(&self, text: &str) {
        self.failing_texts.lock().await.insert(text.to_string());
    }

    /// Let sends to this recipient succeed again.
    pub async fn clear_failure(&self, user: &UserId) {
        self.failing.lock().await.remove(&user.0);
    }

    /// All successful deliveries, in send order.
    pub async fn sent(&self) -> Vec<(UserId, String)> {
        self.sent.lock().await.clone()
    }

    /// Texts successfully delivered to one recipient, in send order.
    pub async fn sent_to(&self, user: &UserId) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send_text(&self, recipient: &UserId, text: &str) -> Result<(), ZaplineError> {
        if self.failing.lock().await.contains(&recipient.0)
            || self.failing_texts.lock().await.contains(text)
        {
            return Err(ZaplineError::delivery(format!(
                "mock transport refused delivery to {recipient}"
            )));
        }
        self.sent
            .lock()
            .await
            .push((recipient.clone(), text.to_string()));
        Ok(())
    }
}
