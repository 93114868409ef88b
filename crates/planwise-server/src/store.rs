// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::{collections::BTreeMap, num::NonZeroUsize};

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

/// Process-lifetime result store with a hard size limit.
///
/// When full, inserting evicts the least recently written entry.
pub struct BoundedStore<V> {
    name: &'static str,
    inner: Mutex<LruCache<String, V>>,
}

impl<V: Clone> BoundedStore<V> {
    /// A capacity of 0 is treated as 1.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { name, inner: Mutex::new(LruCache::new(cap)) }
    }

    /// Insert or replace `key`.
    pub async fn insert(&self, key: String, value: V) {
        let mut inner = self.inner.lock().await;
        if let Some((evicted, _)) = inner.push(key.clone(), value) {
            if evicted != key {
                debug!(store = self.name, key = %evicted, "evicted oldest entry");
            }
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.lock().await.peek(key).cloned()
    }

    /// Copy of every entry, keyed for stable JSON output.
    pub async fn snapshot(&self) -> BTreeMap<String, V> {
        self.inner
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn oldest_entry_is_evicted_at_capacity() {
        let store = BoundedStore::new("test", 2);
        store.insert("a".into(), 1).await;
        store.insert("b".into(), 2).await;
        store.insert("c".into(), 3).await;
        assert_eq!(store.len().await, 2);
        assert!(store.get("a").await.is_none());
        assert_eq!(store.get("c").await, Some(3));
    }

    #[tokio::test]
    async fn rewriting_a_key_replaces_value() {
        let store = BoundedStore::new("test", 2);
        store.insert("a".into(), 1).await;
        store.insert("a".into(), 9).await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("a").await, Some(9));
    }

    #[tokio::test]
    async fn zero_capacity_still_holds_one() {
        let store = BoundedStore::new("test", 0);
        store.insert("a".into(), "x".to_string()).await;
        assert_eq!(store.snapshot().await.len(), 1);
    }
}
