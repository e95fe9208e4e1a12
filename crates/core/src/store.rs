//! KvBackend trait: durable key-value storage with per-record expiry.
//!
//! Thread and job stores sit on top of this trait and own their own
//! volatile fallback; a backend only reports what it could or could not do.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::StoreError;

/// The core KvBackend trait.
///
/// Implementations: SQLite, in-memory (for testing), offline (always fails).
/// Every operation may fail; callers decide how to degrade.
#[async_trait]
pub trait KvBackend: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory", "offline").
    fn name(&self) -> &str;

    /// Insert or fully replace the value stored under `key`.
    /// The record expires `ttl` after this write.
    async fn put(&self, key: &str, value: String, ttl: Duration)
    -> std::result::Result<(), StoreError>;

    /// Fetch the live value under `key`, if any. Expired records are absent.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> std::result::Result<(), StoreError>;

    /// Delete every expired record and return how many were removed.
    ///
    /// Backends whose records disappear on their own keep the default.
    async fn purge_expired(&self) -> std::result::Result<u64, StoreError> {
        Ok(0)
    }
}
