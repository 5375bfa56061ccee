// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value store capability (Redis-shaped, remote, fallible).

use async_trait::async_trait;

use crate::error::ZaplineError;

/// The durable store Zapline persists state into.
///
/// Every operation is a remote call that may fail transiently with
/// [`ZaplineError::Store`]. Callers decide per call site whether a failure
/// propagates (primary state transitions) or is swallowed with a warning
/// (TTL refreshes, observability writes).
///
/// Sorted-set scores are unix-millisecond timestamps; `z_add` upserts, so a
/// member appears at most once per key with its score overwritten in place.
#[async_trait]
pub trait DurableStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<String>, ZaplineError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), ZaplineError>;
    async fn del(&self, key: &str) -> Result<(), ZaplineError>;

    /// Add members to a set; returns how many were newly added.
    async fn s_add(&self, key: &str, members: &[String]) -> Result<u64, ZaplineError>;
    /// Remove a member from a set; returns how many were removed.
    async fn s_rem(&self, key: &str, member: &str) -> Result<u64, ZaplineError>;
    async fn s_is_member(&self, key: &str, member: &str) -> Result<bool, ZaplineError>;
    async fn s_members(&self, key: &str) -> Result<Vec<String>, ZaplineError>;
    async fn s_card(&self, key: &str) -> Result<u64, ZaplineError>;

    /// Push a value at the head of a list (newest first).
    async fn l_push(&self, key: &str, value: &str) -> Result<(), ZaplineError>;
    /// Inclusive range read; negative indices count from the tail.
    async fn l_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, ZaplineError>;
    /// Keep only the inclusive range, dropping everything else.
    async fn l_trim(&self, key: &str, start: i64, stop: i64) -> Result<(), ZaplineError>;

    /// Upsert a member with the given score.
    async fn z_add(&self, key: &str, score: i64, member: &str) -> Result<(), ZaplineError>;
    async fn z_rem(&self, key: &str, member: &str) -> Result<(), ZaplineError>;
    async fn z_score(&self, key: &str, member: &str) -> Result<Option<i64>, ZaplineError>;
    /// Count members with score in the inclusive range.
    async fn z_count(&self, key: &str, min: i64, max: i64) -> Result<u64, ZaplineError>;
    /// Members with score in the inclusive range, capped at `limit`.
    async fn z_range_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
        limit: usize,
    ) -> Result<Vec<String>, ZaplineError>;

    /// Set or refresh a key's time-to-live.
    async fn expire(&self, key: &str, seconds: u64) -> Result<(), ZaplineError>;
}
