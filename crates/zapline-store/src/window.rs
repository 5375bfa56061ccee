// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Repository for per-user engagement window state.

use std::sync::Arc;

use tracing::warn;

use zapline_core::types::{FAR_FUTURE_MS, UserId};
use zapline_core::{DurableStore, ZaplineError};

use crate::keys;

/// Last-inbound timestamps only matter for a day, but they are kept as long
/// as campaign history so admin views stay consistent.
const WINDOW_RETENTION_SECS: u64 = 45 * 24 * 3600;

/// Typed access to the window timestamps and the global reachability index.
#[derive(Clone)]
pub struct WindowRepository {
    store: Arc<dyn DurableStore>,
}

impl WindowRepository {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    /// Record an inbound touch: last-inbound timestamp, reachability index
    /// upsert, and known-user registration.
    ///
    /// The two primary writes are idempotent and convergent; the retention
    /// refresh is best-effort and never fails the touch.
    pub async fn record_touch(
        &self,
        user: &UserId,
        at_ms: i64,
        window_ends_at_ms: i64,
    ) -> Result<(), ZaplineError> {
        let last_key = keys::window_last(user);
        self.store.set(&last_key, &at_ms.to_string()).await?;
        self.store
            .z_add(keys::WINDOW_INDEX, window_ends_at_ms, &user.0)
            .await?;
        self.store
            .s_add(keys::KNOWN_USERS, std::slice::from_ref(&user.0))
            .await?;

        if let Err(err) = self.store.expire(&last_key, WINDOW_RETENTION_SECS).await {
            warn!(user = %user, error = %err, "window retention refresh failed");
        }
        Ok(())
    }

    /// The user's indexed window expiry, if they were ever touched.
    pub async fn window_ends_at(&self, user: &UserId) -> Result<Option<i64>, ZaplineError> {
        self.store.z_score(keys::WINDOW_INDEX, &user.0).await
    }

    /// The user's last inbound timestamp, if recorded.
    pub async fn last_inbound_at(&self, user: &UserId) -> Result<Option<i64>, ZaplineError> {
        let raw = self.store.get(&keys::window_last(user)).await?;
        Ok(raw.and_then(|v| v.parse::<i64>().ok()))
    }

    /// How many users have a window expiring at or after `at_ms`.
    pub async fn reachable_count(&self, at_ms: i64) -> Result<u64, ZaplineError> {
        self.store
            .z_count(keys::WINDOW_INDEX, at_ms, FAR_FUTURE_MS)
            .await
    }

    /// Users whose window expires at or after `at_ms`, capped at `limit`.
    pub async fn reachable_users(
        &self,
        at_ms: i64,
        limit: usize,
    ) -> Result<Vec<UserId>, ZaplineError> {
        let members = self
            .store
            .z_range_by_score(keys::WINDOW_INDEX, at_ms, FAR_FUTURE_MS, limit)
            .await?;
        Ok(members.into_iter().map(UserId).collect())
    }

    /// Best-effort removal of both window entries; used by reset paths.
    /// Each removal is independent and failures are swallowed.
    pub async fn clear(&self, user: &UserId) {
        if let Err(err) = self.store.del(&keys::window_last(user)).await {
            warn!(user = %user, error = %err, "failed to delete last-inbound timestamp");
        }
        if let Err(err) = self.store.z_rem(keys::WINDOW_INDEX, &user.0).await {
            warn!(user = %user, error = %err, "failed to remove reachability index entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zapline_test_utils::MemoryStore;

    fn repo() -> WindowRepository {
        WindowRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn record_touch_writes_both_entries_and_registers_user() {
        let repo = repo();
        let user = UserId::from("u1");

        repo.record_touch(&user, 1_000, 1_000 + 86_400_000)
            .await
            .unwrap();

        assert_eq!(repo.last_inbound_at(&user).await.unwrap(), Some(1_000));
        assert_eq!(
            repo.window_ends_at(&user).await.unwrap(),
            Some(1_000 + 86_400_000)
        );
        assert_eq!(repo.reachable_count(1_000).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn index_holds_one_entry_per_user() {
        let repo = repo();
        let user = UserId::from("u1");

        repo.record_touch(&user, 1_000, 87_000).await.unwrap();
        repo.record_touch(&user, 2_000, 88_000).await.unwrap();

        // Re-touch overwrites, never appends.
        assert_eq!(repo.reachable_count(0).await.unwrap(), 1);
        assert_eq!(repo.window_ends_at(&user).await.unwrap(), Some(88_000));
    }

    #[tokio::test]
    async fn clear_removes_both_entries_without_error() {
        let repo = repo();
        let user = UserId::from("u1");
        repo.record_touch(&user, 1_000, 87_000).await.unwrap();

        repo.clear(&user).await;
        assert_eq!(repo.last_inbound_at(&user).await.unwrap(), None);
        assert_eq!(repo.window_ends_at(&user).await.unwrap(), None);

        // Clearing an unknown user is a no-op, not an error.
        repo.clear(&UserId::from("ghost")).await;
    }

    #[tokio::test]
    async fn reachable_users_respects_limit() {
        let repo = repo();
        for i in 0..5 {
            let user = UserId(format!("u{i}"));
            repo.record_touch(&user, 1_000, 90_000 + i).await.unwrap();
        }

        let capped = repo.reachable_users(0, 3).await.unwrap();
        assert_eq!(capped.len(), 3);
        let all = repo.reachable_users(0, 100).await.unwrap();
        assert_eq!(all.len(), 5);
    }
}
