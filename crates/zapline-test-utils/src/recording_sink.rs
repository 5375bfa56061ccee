// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sink that records everything emitted, for assertions.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use zapline_core::EventSink;

/// Records emitted events in order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first.
    pub async fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().await.clone()
    }

    /// Event names only, oldest first.
    pub async fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .await
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: &str, payload: Value) {
        self.events.lock().await.push((event.to_string(), payload));
    }
}
