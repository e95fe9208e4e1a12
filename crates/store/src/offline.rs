//! Offline backend: a durable tier that is never reachable.
//!
//! Selecting it (`store.backend = "none"`) serves every request from the
//! stores' volatile fallback.

use async_trait::async_trait;
use fobench_core::KvBackend;
use fobench_core::error::StoreError;
use std::time::Duration;

/// A backend whose every operation fails with `StoreError::Unavailable`.
pub struct OfflineKv;

fn unavailable() -> StoreError {
    StoreError::Unavailable("no durable backend configured".into())
}

#[async_trait]
impl KvBackend for OfflineKv {
    fn name(&self) -> &str {
        "offline"
    }

    async fn put(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
