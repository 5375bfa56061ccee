// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process `DurableStore` with Redis-shaped semantics for tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use zapline_core::{DurableStore, ZaplineError};

#[derive(Default)]
struct Inner {
    strings: HashMap<String, String>,
    sets: HashMap<String, HashSet<String>>,
    lists: HashMap<String, Vec<String>>,
    zsets: HashMap<String, HashMap<String, i64>>,
    ttls: HashMap<String, u64>,
}

/// An in-memory store mirroring the durable store semantics Zapline relies
/// on: list head-push, inclusive ranges with negative indices, and sorted
/// sets that upsert scores.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL recorded for a key by `expire`, for asserting retention writes.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        self.inner.lock().await.ttls.get(key).copied()
    }
}

/// Resolve an inclusive, possibly-negative range against a list length.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = len as i64;
    let mut start = if start < 0 { len + start } else { start };
    let mut stop = if stop < 0 { len + stop } else { stop };
    start = start.max(0);
    stop = stop.min(len - 1);
    if start > stop || len == 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ZaplineError> {
        Ok(self.inner.lock().await.strings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ZaplineError> {
        self.inner
            .lock()
            .await
            .strings
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), ZaplineError> {
        let mut inner = self.inner.lock().await;
        inner.strings.remove(key);
        inner.sets.remove(key);
        inner.lists.remove(key);
        inner.zsets.remove(key);
        Ok(())
    }

    async fn s_add(&self, key: &str, members: &[String]) -> Result<u64, ZaplineError> {
        let mut inner = self.inner.lock().await;
        let set = inner.sets.entry(key.to_string()).or_default();
        let mut added = 0;
        for member in members {
            if set.insert(member.clone()) {
                added += 1;
            }
        }
        Ok(added)
    }

    async fn s_rem(&self, key: &str, member: &str) -> Result<u64, ZaplineError> {
        let mut inner = self.inner.lock().await;
        let removed = inner
            .sets
            .get_mut(key)
            .is_some_and(|set| set.remove(member));
        Ok(u64::from(removed))
    }

    async fn s_is_member(&self, key: &str, member: &str) -> Result<bool, ZaplineError> {
        let inner = self.inner.lock().await;
        Ok(inner.sets.get(key).is_some_and(|set| set.contains(member)))
    }

    async fn s_members(&self, key: &str) -> Result<Vec<String>, ZaplineError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn s_card(&self, key: &str) -> Result<u64, ZaplineError> {
        let inner = self.inner.lock().await;
        Ok(inner.sets.get(key).map_or(0, |set| set.len() as u64))
    }

    async fn l_push(&self, key: &str, value: &str) -> Result<(), ZaplineError> {
        let mut inner = self.inner.lock().await;
        inner
            .lists
            .entry(key.to_string())
            .or_default()
            .insert(0, value.to_string());
        Ok(())
    }

    async fn l_range(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, ZaplineError> {
        let inner = self.inner.lock().await;
        let Some(list) = inner.lists.get(key) else {
            return Ok(Vec::new());
        };
        Ok(resolve_range(list.len(), start, stop)
            .map(|(lo, hi)| list[lo..=hi].to_vec())
            .unwrap_or_default())
    }

    async fn l_trim(&self, key: &str, start: i64, stop: i64) -> Result<(), ZaplineError> {
        let mut inner = self.inner.lock().await;
        if let Some(list) = inner.lists.get_mut(key) {
            match resolve_range(list.len(), start, stop) {
                Some((lo, hi)) => *list = list[lo..=hi].to_vec(),
                None => list.clear(),
            }
        }
        Ok(())
    }

    async fn z_add(&self, key: &str, score: i64, member: &str) -> Result<(), ZaplineError> {
        let mut inner = self.inner.lock().await;
        inner
            .zsets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn z_rem(&self, key: &str, member: &str) -> Result<(), ZaplineError> {
        let mut inner = self.inner.lock().await;
        if let Some(zset) = inner.zsets.get_mut(key) {
            zset.remove(member);
        }
        Ok(())
    }

    async fn z_score(&self, key: &str, member: &str) -> Result<Option<i64>, ZaplineError> {
        let inner = self.inner.lock().await;
        Ok(inner.zsets.get(key).and_then(|zset| zset.get(member).copied()))
    }

    async fn z_count(&self, key: &str, min: i64, max: i64) -> Result<u64, ZaplineError> {
        let inner = self.inner.lock().await;
        Ok(inner.zsets.get(key).map_or(0, |zset| {
            zset.values().filter(|s| (min..=max).contains(*s)).count() as u64
        }))
    }

    async fn z_range_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
        limit: usize,
    ) -> Result<Vec<String>, ZaplineError> {
        let inner = self.inner.lock().await;
        let Some(zset) = inner.zsets.get(key) else {
            return Ok(Vec::new());
        };
        let mut matching: Vec<(&String, i64)> = zset
            .iter()
            .filter(|(_, s)| (min..=max).contains(*s))
            .map(|(m, s)| (m, *s))
            .collect();
        // Score order, member order as tie-break, like the real store.
        matching.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|(m, _)| m.clone())
            .collect())
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), ZaplineError> {
        self.inner
            .lock()
            .await
            .ttls
            .insert(key.to_string(), seconds);
        Ok(())
    }
}
