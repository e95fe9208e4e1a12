//! Storage for fobench: key-value backends plus the thread and job stores
//! that degrade to a volatile in-process map when the backend fails.

pub mod in_memory;
pub mod job_store;
pub mod offline;
pub mod thread_store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryKv;
pub use job_store::{AbortOutcome, JobRecord, JobStatus, JobStore};
pub use offline::OfflineKv;
pub use thread_store::{ThreadRecord, ThreadStore};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteKv;

use std::time::Duration;

/// Convert a TTL expressed in days. Saturates instead of overflowing.
pub fn days(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(24 * 60 * 60))
}

/// Unix timestamp at which a record written now with `ttl` expires.
pub(crate) fn expiry_timestamp(ttl: Duration) -> i64 {
    let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    chrono::Utc::now().timestamp().saturating_add(secs)
}
