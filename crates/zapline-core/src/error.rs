// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Zapline workspace.

use thiserror::Error;

/// The primary error type used across all Zapline crates.
#[derive(Debug, Error)]
pub enum ZaplineError {
    /// A required argument was empty or malformed (empty user id, bad campaign id).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required request field was absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Durable store errors (connection failure, command failure, serialization).
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Outbound delivery failed for a single recipient.
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Campaign metadata exists but is unusable (broadcast text is missing).
    #[error("corrupted campaign: {campaign_id}")]
    CorruptedCampaign { campaign_id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ZaplineError {
    /// Wrap an arbitrary error as a store failure.
    pub fn store(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Store {
            source: source.into(),
        }
    }

    /// Build a delivery failure from a bare message.
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery {
            message: message.into(),
            source: None,
        }
    }
}
