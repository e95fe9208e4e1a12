//! Job bookkeeping for the execute/status/abort API.
//!
//! Same two-tier pattern as the thread store: durable backend first,
//! volatile map on failure. Job records expire after seven days.

use chrono::{DateTime, Utc};
use fobench_core::KvBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Error,
    Aborted,
}

impl JobStatus {
    /// Completed, failed, and aborted jobs can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error | JobStatus::Aborted)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
            JobStatus::Error => "error",
            JobStatus::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job as seen by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,

    /// The raw `inputs` list from the execute request
    #[serde(default)]
    pub inputs: serde_json::Value,

    #[serde(rename = "webhookUrl", default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn pending(id: impl Into<String>, inputs: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            inputs,
            webhook_url: None,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_webhook(mut self, url: Option<String>) -> Self {
        self.webhook_url = url.filter(|u| !u.trim().is_empty());
        self
    }
}

/// The persisted envelope: the job itself travels as an opaque JSON blob.
#[derive(Debug, Serialize, Deserialize)]
struct StoredJob {
    id: String,
    data: String,
    created_at: String,
    ttl: i64,
}

/// What [`JobStore::abort`] did.
#[derive(Debug, Clone)]
pub enum AbortOutcome {
    Aborted(JobRecord),
    /// The job had already finished with this status
    AlreadyFinished(JobStatus),
    NotFound,
}

pub struct JobStore {
    backend: Arc<dyn KvBackend>,
    fallback: RwLock<HashMap<String, JobRecord>>,
    /// Serializes read-modify-write status transitions
    transitions: Mutex<()>,
    ttl: Duration,
}

impl JobStore {
    /// Create a store over `backend` with the default 7-day TTL.
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            backend,
            fallback: RwLock::new(HashMap::new()),
            transitions: Mutex::new(()),
            ttl: crate::days(7),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Persist a job. Always succeeds; failures land in the local cache.
    pub async fn save(&self, job: &JobRecord) {
        let written = match self.encode(job) {
            Ok(value) => self
                .backend
                .put(&job.id, value, self.ttl)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match written {
            Ok(()) => debug!(job_id = %job.id, status = %job.status, "Job saved"),
            Err(reason) => {
                warn!(job_id = %job.id, error = %reason, "Job write failed, keeping it in local cache");
                self.fallback
                    .write()
                    .await
                    .insert(job.id.clone(), job.clone());
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        match self.backend.get(id).await {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(job) => Some(job),
                Err(e) => {
                    warn!(job_id = %id, error = %e, "Malformed job record, using local cache");
                    self.fallback.read().await.get(id).cloned()
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(job_id = %id, error = %e, "Job read failed, using local cache");
                self.fallback.read().await.get(id).cloned()
            }
        }
    }

    /// Move a job to `status`, replacing its result when one is given.
    ///
    /// An aborted job stays aborted: a run finishing after the abort does
    /// not overwrite it. Returns the stored record, or `None` if unknown.
    pub async fn update_status(
        &self,
        id: &str,
        status: JobStatus,
        result: Option<serde_json::Value>,
    ) -> Option<JobRecord> {
        let _guard = self.transitions.lock().await;
        let mut job = self.get(id).await?;

        if job.status == JobStatus::Aborted && status != JobStatus::Aborted {
            debug!(job_id = %id, requested = %status, "Job already aborted, keeping status");
            return Some(job);
        }

        job.status = status;
        job.updated_at = Utc::now();
        if result.is_some() {
            job.result = result;
        }
        self.save(&job).await;
        Some(job)
    }

    /// Abort a job that has not finished yet.
    ///
    /// Checked and written under the same lock as [`update_status`], so a
    /// run completing concurrently either lands first (and the abort is
    /// refused) or finds the job aborted.
    ///
    /// [`update_status`]: JobStore::update_status
    pub async fn abort(&self, id: &str, result: serde_json::Value) -> AbortOutcome {
        let _guard = self.transitions.lock().await;
        let Some(mut job) = self.get(id).await else {
            return AbortOutcome::NotFound;
        };
        if job.status.is_terminal() {
            return AbortOutcome::AlreadyFinished(job.status);
        }

        job.status = JobStatus::Aborted;
        job.updated_at = Utc::now();
        job.result = Some(result);
        self.save(&job).await;
        AbortOutcome::Aborted(job)
    }

    /// Drop expired jobs from the durable tier. Returns how many went.
    pub async fn purge_expired(&self) -> u64 {
        match self.backend.purge_expired().await {
            Ok(removed) => removed,
            Err(e) => {
                warn!(error = %e, "Job sweep failed");
                0
            }
        }
    }

    pub async fn delete(&self, id: &str) -> bool {
        let id = id.trim();
        if id.is_empty() {
            return false;
        }
        let cached = self.fallback.write().await.remove(id).is_some();
        match self.backend.delete(id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(job_id = %id, error = %e, "Job delete failed");
                cached
            }
        }
    }

    fn encode(&self, job: &JobRecord) -> serde_json::Result<String> {
        let stored = StoredJob {
            id: job.id.clone(),
            data: serde_json::to_string(job)?,
            created_at: job.created_at.to_rfc3339(),
            ttl: crate::expiry_timestamp(self.ttl),
        };
        serde_json::to_string(&stored)
    }
}

fn decode(raw: &str) -> serde_json::Result<JobRecord> {
    let stored: StoredJob = serde_json::from_str(raw)?;
    serde_json::from_str(&stored.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryKv, OfflineKv};
    use serde_json::json;

    fn inputs() -> serde_json::Value {
        json!([{ "name": "payload", "data": "CEO pay in Zurich?" }])
    }

    #[tokio::test]
    async fn save_and_get() {
        let store = JobStore::new(Arc::new(InMemoryKv::new()));
        let job = JobRecord::pending("job-1", inputs()).with_webhook(Some("http://hook".into()));
        store.save(&job).await;

        let loaded = store.get("job-1").await.unwrap();
        assert_eq!(loaded.status, JobStatus::Pending);
        assert_eq!(loaded.webhook_url.as_deref(), Some("http://hook"));
        assert_eq!(loaded.inputs, inputs());
        assert!(store.get("job-2").await.is_none());
    }

    #[tokio::test]
    async fn update_status_sets_result() {
        let store = JobStore::new(Arc::new(InMemoryKv::new()));
        store.save(&JobRecord::pending("job-1", inputs())).await;

        let updated = store
            .update_status("job-1", JobStatus::Completed, Some(json!({ "output": "done" })))
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Completed);

        let loaded = store.get("job-1").await.unwrap();
        assert_eq!(loaded.result, Some(json!({ "output": "done" })));
        assert!(loaded.updated_at >= loaded.created_at);
    }

    #[tokio::test]
    async fn unknown_job_is_not_created() {
        let store = JobStore::new(Arc::new(InMemoryKv::new()));
        assert!(store.update_status("ghost", JobStatus::Error, None).await.is_none());
        assert!(store.get("ghost").await.is_none());
    }

    #[tokio::test]
    async fn aborted_job_is_not_overwritten() {
        let store = JobStore::new(Arc::new(InMemoryKv::new()));
        store.save(&JobRecord::pending("job-1", inputs())).await;
        store.update_status("job-1", JobStatus::Aborted, None).await;

        let after = store
            .update_status("job-1", JobStatus::Completed, Some(json!({ "output": "late" })))
            .await
            .unwrap();
        assert_eq!(after.status, JobStatus::Aborted);
        assert!(after.result.is_none());
    }

    /// Returns each value read 50ms after reading it, so concurrent
    /// transitions overlap.
    struct SlowReadKv(InMemoryKv);

    #[async_trait::async_trait]
    impl KvBackend for SlowReadKv {
        fn name(&self) -> &str {
            "slow_read"
        }

        async fn get(&self, key: &str) -> Result<Option<String>, fobench_core::error::StoreError> {
            let value = self.0.get(key).await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            value
        }

        async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<(), fobench_core::error::StoreError> {
            self.0.put(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> Result<(), fobench_core::error::StoreError> {
            self.0.delete(key).await
        }
    }

    #[tokio::test]
    async fn late_completion_does_not_overwrite_concurrent_abort() {
        let store = Arc::new(JobStore::new(Arc::new(SlowReadKv(InMemoryKv::new()))));
        store.save(&JobRecord::pending("job-1", inputs())).await;

        let aborting = {
            let store = store.clone();
            tokio::spawn(async move { store.abort("job-1", json!({ "reason": "stop" })).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let completed = store
            .update_status("job-1", JobStatus::Completed, Some(json!({ "output": "late" })))
            .await
            .unwrap();

        assert!(matches!(aborting.await.unwrap(), AbortOutcome::Aborted(_)));
        assert_eq!(completed.status, JobStatus::Aborted);
        let stored = store.get("job-1").await.unwrap();
        assert_eq!(stored.status, JobStatus::Aborted);
        assert_eq!(stored.result, Some(json!({ "reason": "stop" })));
    }

    #[tokio::test]
    async fn abort_refuses_a_job_that_finished_first() {
        let store = Arc::new(JobStore::new(Arc::new(SlowReadKv(InMemoryKv::new()))));
        store.save(&JobRecord::pending("job-1", inputs())).await;

        let completing = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .update_status("job-1", JobStatus::Completed, Some(json!({ "output": "done" })))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        let outcome = store.abort("job-1", json!({ "reason": "stop" })).await;

        assert!(matches!(outcome, AbortOutcome::AlreadyFinished(JobStatus::Completed)));
        assert_eq!(completing.await.unwrap().unwrap().status, JobStatus::Completed);
        assert_eq!(store.get("job-1").await.unwrap().status, JobStatus::Completed);
        assert!(matches!(store.abort("ghost", json!({})).await, AbortOutcome::NotFound));
    }

    #[tokio::test]
    async fn offline_backend_uses_cache() {
        let store = JobStore::new(Arc::new(OfflineKv));
        store.save(&JobRecord::pending("job-1", inputs())).await;
        store.update_status("job-1", JobStatus::InProgress, None).await;
        assert_eq!(store.get("job-1").await.unwrap().status, JobStatus::InProgress);
        assert!(store.delete("job-1").await);
        assert!(store.get("job-1").await.is_none());
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Error.is_terminal());
        assert!(JobStatus::Aborted.is_terminal());
        assert_eq!(serde_json::to_string(&JobStatus::InProgress).unwrap(), "\"in_progress\"");
    }
}
