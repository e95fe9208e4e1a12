//! Thread store: conversation histories keyed by thread id.
//!
//! Writes go to the durable backend first. When the backend fails (down,
//! throttled, or returning a record that does not decode) the store logs a
//! warning and serves the request from a volatile map it owns, so callers
//! never see a storage error.
//!
//! The two tiers are never reconciled. A history written to the volatile
//! map while the backend was down is shadowed once the backend recovers
//! and reports "not found" for that id.

use chrono::Utc;
use fobench_core::{ConversationHistory, KvBackend, ThreadId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// The persisted shape of one thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub thread_id: String,
    /// JSON array of `{role, content}` turns
    pub messages: String,
    pub message_count: usize,
    /// RFC 3339 timestamp of the last write
    pub updated_at: String,
    /// Unix timestamp after which the record expires
    pub ttl: i64,
}

pub struct ThreadStore {
    backend: Arc<dyn KvBackend>,
    fallback: RwLock<HashMap<String, ConversationHistory>>,
    ttl: Duration,
}

impl ThreadStore {
    /// Create a store over `backend` with the default 30-day TTL.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            fallback: RwLock::new(HashMap::new()),
            ttl: crate::days(30),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Rehydrate a thread. Absent, empty, or unknown ids yield an empty history.
    pub async fn get(&self, thread_id: Option<&str>) -> ConversationHistory {
        let Some(id) = thread_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return ConversationHistory::new();
        };

        match self.backend.get(id).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(history) => {
                    debug!(thread_id = %id, turns = history.len(), "Thread loaded");
                    history
                }
                Err(e) => {
                    warn!(thread_id = %id, error = %e, "Malformed thread record, using local cache");
                    self.from_fallback(id).await
                }
            },
            Ok(None) => ConversationHistory::new(),
            Err(e) => {
                warn!(
                    thread_id = %id,
                    backend = self.backend.name(),
                    error = %e,
                    "Thread read failed, using local cache"
                );
                self.from_fallback(id).await
            }
        }
    }

    /// Persist `history` under `thread_id`, generating an id when none is given.
    /// Always succeeds; returns the id the history was stored under.
    pub async fn save(&self, thread_id: Option<&str>, history: &ConversationHistory) -> ThreadId {
        let id = thread_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ThreadId::from)
            .unwrap_or_default();

        let written = match encode(&id, history, self.ttl) {
            Ok(value) => self.backend.put(id.as_str(), value, self.ttl).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => {
                debug!(thread_id = %id, turns = history.len(), "Thread saved");
            }
            Err(reason) => {
                warn!(
                    thread_id = %id,
                    backend = self.backend.name(),
                    error = %reason,
                    "Thread write failed, keeping it in local cache"
                );
                self.fallback
                    .write()
                    .await
                    .insert(id.as_str().to_string(), history.clone());
            }
        }

        id
    }

    /// Remove a thread from both tiers. Returns whether anything was removed
    /// (durable delete succeeded, or a cached copy existed).
    pub async fn delete(&self, thread_id: &str) -> bool {
        let id = thread_id.trim();
        if id.is_empty() {
            return false;
        }

        let cached = self.fallback.write().await.remove(id).is_some();
        match self.backend.delete(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(thread_id = %id, error = %e, "Thread delete failed");
                cached
            }
        }
    }

    /// Drop expired threads from the durable tier. Returns how many went.
    pub async fn purge_expired(&self) -> u64 {
        match self.backend.purge_expired().await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Thread sweep failed");
                0
            }
        }
    }

    /// Number of threads currently held only in the volatile map.
    pub async fn cached_len(&self) -> usize {
        self.fallback.read().await.len()
    }

    async fn from_fallback(&self, id: &str) -> ConversationHistory {
        self.fallback
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

fn encode(id: &ThreadId, history: &ConversationHistory, ttl: Duration) -> serde_json::Result<String> {
    let now = Utc::now();
    let record = ThreadRecord {
        thread_id: id.to_string(),
        messages: history.to_json()?,
        message_count: history.len(),
        updated_at: now.to_rfc3339(),
        ttl: crate::expiry_timestamp(ttl),
    };
    serde_json::to_string(&record)
}

fn decode(raw: &str) -> serde_json::Result<ConversationHistory> {
    let record: ThreadRecord = serde_json::from_str(raw)?;
    ConversationHistory::from_json(&record.messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryKv, OfflineKv};
    use async_trait::async_trait;
    use fobench_core::Turn;
    use fobench_core::error::StoreError;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Wraps an in-memory backend and fails every call while `down` is set.
    struct FlakyKv {
        inner: InMemoryKv,
        down: AtomicBool,
    }

    impl FlakyKv {
        fn new() -> Self {
            Self {
                inner: InMemoryKv::new(),
                down: AtomicBool::new(false),
            }
        }

        fn set_down(&self, down: bool) {
            self.down.store(down, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.down.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("throttled".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl KvBackend for FlakyKv {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
            self.check()?;
            self.inner.put(key, value, ttl).await
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.check()?;
            self.inner.get(key).await
        }

        async fn delete(&self, key: &str) -> Result<(), StoreError> {
            self.check()?;
            self.inner.delete(key).await
        }
    }

    fn exchange(q: &str, a: &str) -> ConversationHistory {
        ConversationHistory::from_turns(vec![Turn::user(q), Turn::assistant(a)])
    }

    #[tokio::test]
    async fn save_without_id_generates_one() {
        let store = ThreadStore::new(Arc::new(InMemoryKv::new()));
        let history = exchange("Typical CIO bonus?", "40-60% of base.");

        let id = store.save(None, &history).await;
        assert!(!id.as_str().is_empty());
        assert_eq!(store.get(Some(id.as_str())).await, history);

        let blank = store.save(Some("  "), &history).await;
        assert_ne!(blank, id);
    }

    #[tokio::test]
    async fn second_save_replaces_first() {
        let store = ThreadStore::new(Arc::new(InMemoryKv::new()));
        let first = exchange("q1", "a1");
        let mut second = first.clone();
        second.push(Turn::user("q2"));
        second.push(Turn::assistant("a2"));

        let id = store.save(None, &first).await;
        let same = store.save(Some(id.as_str()), &second).await;
        assert_eq!(same, id);
        assert_eq!(store.get(Some(id.as_str())).await, second);
    }

    #[tokio::test]
    async fn unknown_or_empty_ids_yield_empty_history() {
        let store = ThreadStore::new(Arc::new(InMemoryKv::new()));
        assert!(store.get(None).await.is_empty());
        assert!(store.get(Some("")).await.is_empty());
        assert!(store.get(Some("no-such-thread")).await.is_empty());
    }

    #[tokio::test]
    async fn offline_backend_round_trips_through_cache() {
        let store = ThreadStore::new(Arc::new(OfflineKv));
        let history = exchange("Head of tax pay in Dubai?", "Tax-free packages near $300k.");

        let id = store.save(None, &history).await;
        assert_eq!(store.get(Some(id.as_str())).await, history);
        assert_eq!(store.cached_len().await, 1);
    }

    #[tokio::test]
    async fn durable_not_found_shadows_cached_copy() {
        let backend = Arc::new(FlakyKv::new());
        let store = ThreadStore::new(backend.clone());
        let history = exchange("q", "a");

        backend.set_down(true);
        let id = store.save(None, &history).await;
        assert_eq!(store.get(Some(id.as_str())).await, history);

        backend.set_down(false);
        assert!(store.get(Some(id.as_str())).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_record_falls_back() {
        let backend = Arc::new(InMemoryKv::new());
        backend
            .put("bad", "{not json".into(), Duration::from_secs(60))
            .await
            .unwrap();
        let store = ThreadStore::new(backend);
        assert!(store.get(Some("bad")).await.is_empty());
    }

    #[tokio::test]
    async fn record_carries_count_and_expiry() {
        let backend = Arc::new(InMemoryKv::new());
        let store = ThreadStore::new(backend.clone()).with_ttl(crate::days(30));
        let id = store.save(None, &exchange("q", "a")).await;

        let raw = backend.get(id.as_str()).await.unwrap().unwrap();
        let record: ThreadRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(record.thread_id, id.as_str());
        assert_eq!(record.message_count, 2);
        let thirty_days = 30 * 24 * 60 * 60;
        assert!(record.ttl - Utc::now().timestamp() > thirty_days - 60);
    }

    #[tokio::test]
    async fn delete_removes_thread() {
        let store = ThreadStore::new(Arc::new(InMemoryKv::new()));
        let id = store.save(None, &exchange("q", "a")).await;

        assert!(store.delete(id.as_str()).await);
        assert!(store.get(Some(id.as_str())).await.is_empty());
        assert!(!store.delete("").await);
    }

    #[tokio::test]
    async fn delete_with_backend_down_clears_cache() {
        let store = ThreadStore::new(Arc::new(OfflineKv));
        let id = store.save(None, &exchange("q", "a")).await;

        assert!(store.delete(id.as_str()).await);
        assert!(!store.delete(id.as_str()).await);
        assert!(store.get(Some(id.as_str())).await.is_empty());
    }
}
