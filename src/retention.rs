//! Retention sweeper
//!
//! Uploads are kept for the life of the process by default. When a maximum
//! age is configured, a background task periodically drops older records
//! from the registry and deletes their blobs.

use std::time::Duration;

use chrono::Utc;

use crate::config::RetentionConfig;
use crate::sessions::SessionRegistry;
use crate::storage::BlobStore;

/// Remove records older than `max_age` relative to `now_millis`, along with
/// their blobs. Returns the number of records removed.
pub async fn sweep(
    registry: &SessionRegistry,
    blob_store: &BlobStore,
    max_age: Duration,
    now_millis: i64,
) -> usize {
    // Ages too large for i64 milliseconds mean "keep everything".
    let max_age_millis = i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX);
    let cutoff = now_millis.saturating_sub(max_age_millis);
    let expired = registry.remove_older_than(cutoff).await;

    for record in &expired {
        if let Err(e) = blob_store.remove(&record.stored_name).await {
            tracing::warn!(
                stored_name = %record.stored_name,
                "Failed to delete expired blob: {}",
                e
            );
        }
    }

    if !expired.is_empty() {
        let remaining = registry.record_count().await;
        let sessions = registry.session_count().await;
        tracing::info!(
            removed = expired.len(),
            remaining = remaining,
            sessions = sessions,
            "Cleaned up expired uploads"
        );
    }

    expired.len()
}

/// Start the background sweeper if retention is enabled.
pub fn start_sweeper(
    config: &RetentionConfig,
    registry: SessionRegistry,
    blob_store: BlobStore,
) -> Option<tokio::task::JoinHandle<()>> {
    let max_age = config.max_age()?;
    let period = config.sweep_interval();

    tracing::info!(
        max_age_secs = max_age.as_secs(),
        interval_secs = period.as_secs(),
        "Upload retention enabled"
    );

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            sweep(&registry, &blob_store, max_age, Utc::now().timestamp_millis()).await;
        }
    }))
}
