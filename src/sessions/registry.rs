//! Session Registry
//!
//! In-memory map from session ID to the records uploaded under it, guarded
//! by an async RwLock. Records are kept in arrival order; listings are
//! sorted newest-first on the way out.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::types::FileRecord;

/// Registry of uploaded file records, keyed by session ID
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, Vec<FileRecord>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, creating the session on first use.
    pub async fn append(&self, session_id: &str, record: FileRecord) {
        let mut sessions = self.inner.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(record);
    }

    /// Records for a session, newest first.
    ///
    /// Unknown sessions yield an empty list. Records sharing a timestamp
    /// come back most recently appended first.
    pub async fn list(&self, session_id: &str) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = {
            let sessions = self.inner.read().await;
            match sessions.get(session_id) {
                Some(records) => records.iter().rev().cloned().collect(),
                None => return Vec::new(),
            }
        };

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Number of sessions with at least one record
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Total number of records across all sessions
    pub async fn record_count(&self) -> usize {
        self.inner.read().await.values().map(Vec::len).sum()
    }

    /// Remove every record created before `cutoff_millis`.
    ///
    /// Sessions left empty are dropped. Returns the removed records so the
    /// caller can clean up their blobs.
    pub async fn remove_older_than(&self, cutoff_millis: i64) -> Vec<FileRecord> {
        let mut removed = Vec::new();
        let mut sessions = self.inner.write().await;

        sessions.retain(|_, records| {
            let (expired, kept): (Vec<_>, Vec<_>) = records
                .drain(..)
                .partition(|r| r.created_at < cutoff_millis);
            removed.extend(expired);
            *records = kept;
            !records.is_empty()
        });

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, created_at: i64) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            name: format!("{}.txt", id),
            size: 1,
            mime_type: "text/plain".to_string(),
            url: format!("http://127.0.0.1:3000/uploads/{}", id),
            created_at,
            stored_name: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let registry = SessionRegistry::new();
        assert!(registry.list("nope").await.is_empty());
        assert_eq!(registry.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let registry = SessionRegistry::new();
        registry.append("abc", record("a", 100)).await;
        registry.append("abc", record("b", 300)).await;
        registry.append("abc", record("c", 200)).await;

        let ids: Vec<_> = registry
            .list("abc")
            .await
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_ties_prefer_latest_append() {
        let registry = SessionRegistry::new();
        registry.append("abc", record("first", 100)).await;
        registry.append("abc", record("second", 100)).await;

        let records = registry.list("abc").await;
        assert_eq!(records[0].id, "second");
        assert_eq!(records[1].id, "first");
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        registry.append("one", record("a", 1)).await;
        registry.append("two", record("b", 2)).await;

        let one = registry.list("one").await;
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].id, "a");
        assert_eq!(registry.session_count().await, 2);
        assert_eq!(registry.record_count().await, 2);
    }

    #[tokio::test]
    async fn test_list_does_not_mutate() {
        let registry = SessionRegistry::new();
        registry.append("abc", record("a", 1)).await;
        registry.append("abc", record("b", 2)).await;

        let _ = registry.list("abc").await;
        let _ = registry.list("missing").await;
        assert_eq!(registry.record_count().await, 2);
        assert_eq!(registry.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_appends_are_not_lost() {
        let registry = SessionRegistry::new();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    registry.append("shared", record(&format!("r{}", i), i)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.list("shared").await.len(), 64);
    }

    #[tokio::test]
    async fn test_remove_older_than() {
        let registry = SessionRegistry::new();
        registry.append("old", record("a", 10)).await;
        registry.append("mixed", record("b", 10)).await;
        registry.append("mixed", record("c", 50)).await;

        let removed = registry.remove_older_than(20).await;
        let mut ids: Vec<_> = removed.into_iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        assert_eq!(registry.session_count().await, 1);
        assert_eq!(registry.list("mixed").await[0].id, "c");
    }
}
