// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The engagement window tracker.
//!
//! Keeping a single sorted index keyed by window expiry makes "who is
//! reachable right now" a range query over `[now, +far-future]`; expiry is
//! implicit in the score comparison, so no background sweep job exists.

use tracing::debug;

use zapline_config::WindowConfig;
use zapline_core::types::{UserId, WindowTouch};
use zapline_core::ZaplineError;
use zapline_store::WindowRepository;

/// Tracks, per user, the platform's 24-hour free-form messaging window.
#[derive(Clone)]
pub struct WindowTracker {
    repo: WindowRepository,
    window_ms: i64,
}

impl WindowTracker {
    pub fn new(repo: WindowRepository, config: &WindowConfig) -> Self {
        Self {
            repo,
            window_ms: (config.window_hours * 3600 * 1000) as i64,
        }
    }

    /// Refresh the user's window from an inbound message at `at_ms`.
    ///
    /// The indexed expiry is plainly overwritten with `at_ms + window`; an
    /// out-of-order touch with an earlier timestamp therefore shortens the
    /// window. Both writes are idempotent, so an interrupted touch converges
    /// on retry.
    pub async fn touch(&self, user: &UserId, at_ms: i64) -> Result<WindowTouch, ZaplineError> {
        if user.0.trim().is_empty() {
            return Err(ZaplineError::InvalidArgument(
                "user id must not be empty".into(),
            ));
        }

        let window_ends_at_ms = at_ms + self.window_ms;
        self.repo.record_touch(user, at_ms, window_ends_at_ms).await?;
        debug!(user = %user, window_ends_at_ms, "window refreshed");

        Ok(WindowTouch {
            user: user.clone(),
            last_inbound_at_ms: at_ms,
            window_ends_at_ms,
        })
    }

    /// Whether the user's window is open at `at_ms`. Derived from the index,
    /// never stored.
    pub async fn is_reachable(&self, user: &UserId, at_ms: i64) -> Result<bool, ZaplineError> {
        Ok(self
            .repo
            .window_ends_at(user)
            .await?
            .is_some_and(|ends_at| ends_at >= at_ms))
    }

    /// How many users are reachable at `at_ms`.
    pub async fn count_reachable(&self, at_ms: i64) -> Result<u64, ZaplineError> {
        self.repo.reachable_count(at_ms).await
    }

    /// Users reachable at `at_ms`, capped at `limit`.
    pub async fn list_reachable(
        &self,
        at_ms: i64,
        limit: usize,
    ) -> Result<Vec<UserId>, ZaplineError> {
        self.repo.reachable_users(at_ms, limit).await
    }

    /// Best-effort removal of the user's window state; reset path only.
    pub async fn clear_for_user(&self, user: &UserId) {
        self.repo.clear(user).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zapline_test_utils::MemoryStore;

    const DAY_MS: i64 = 86_400_000;

    fn tracker() -> WindowTracker {
        let repo = WindowRepository::new(Arc::new(MemoryStore::new()));
        WindowTracker::new(repo, &WindowConfig::default())
    }

    #[tokio::test]
    async fn touch_opens_a_window_that_closes_after_24h() {
        let tracker = tracker();
        let user = UserId::from("5511999990000");
        let t = 1_700_000_000_000;

        let touch = tracker.touch(&user, t).await.unwrap();
        assert_eq!(touch.last_inbound_at_ms, t);
        assert_eq!(touch.window_ends_at_ms, t + DAY_MS);

        assert!(tracker.is_reachable(&user, t).await.unwrap());
        assert!(tracker.is_reachable(&user, t + DAY_MS).await.unwrap());
        assert!(!tracker.is_reachable(&user, t + DAY_MS + 1).await.unwrap());
    }

    #[tokio::test]
    async fn empty_user_id_is_rejected() {
        let tracker = tracker();
        let err = tracker.touch(&UserId::from("  "), 1_000).await.unwrap_err();
        assert!(matches!(err, ZaplineError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn later_touch_extends_the_window() {
        let tracker = tracker();
        let user = UserId::from("u1");
        let t = 1_700_000_000_000;

        tracker.touch(&user, t).await.unwrap();
        tracker.touch(&user, t + 3_600_000).await.unwrap();

        assert!(
            tracker
                .is_reachable(&user, t + DAY_MS + 3_600_000)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn stale_replay_shortens_the_window() {
        // Scores are plainly overwritten, not max-combined: an out-of-order
        // touch with an earlier timestamp shrinks the window. Pinned here so
        // a behavior change shows up as a test failure.
        let tracker = tracker();
        let user = UserId::from("u1");
        let t = 1_700_000_000_000;

        tracker.touch(&user, t + 3_600_000).await.unwrap();
        tracker.touch(&user, t).await.unwrap();

        assert!(!tracker.is_reachable(&user, t + DAY_MS + 1).await.unwrap());
    }

    #[tokio::test]
    async fn count_and_list_cover_only_open_windows() {
        let tracker = tracker();
        let t = 1_700_000_000_000;

        tracker.touch(&UserId::from("fresh"), t).await.unwrap();
        tracker
            .touch(&UserId::from("stale"), t - DAY_MS - 1)
            .await
            .unwrap();

        assert_eq!(tracker.count_reachable(t).await.unwrap(), 1);
        let reachable = tracker.list_reachable(t, 100).await.unwrap();
        assert_eq!(reachable, vec![UserId::from("fresh")]);
    }

    #[tokio::test]
    async fn clear_makes_user_unreachable() {
        let tracker = tracker();
        let user = UserId::from("u1");
        let t = 1_700_000_000_000;

        tracker.touch(&user, t).await.unwrap();
        tracker.clear_for_user(&user).await;
        assert!(!tracker.is_reachable(&user, t).await.unwrap());
    }
}
