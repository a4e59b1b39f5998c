//! Highscore store module
//!
//! Durable persistence and retrieval of the ranked score list. The JSON file
//! is the sole source of truth: every read re-reads it in full and every
//! write re-writes it in full, sorted descending and truncated to the
//! configured maximum.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;

use crate::config::StoreConfig;
use crate::logger;

use super::record::{ScoreRecord, SubmitPayload};

/// Persistent highscore store backed by a single JSON file
pub struct ScoreStore {
    path: PathBuf,
    max_entries: usize,
    placeholder_name: String,
    /// Serializes load-modify-store cycles so concurrent submits cannot
    /// lose updates. Readers do not take this lock.
    write_lock: Mutex<()>,
}

impl ScoreStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            path: PathBuf::from(&config.path),
            max_entries: config.max_entries,
            placeholder_name: config.placeholder_name.clone(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read all records as stored on disk
    ///
    /// A missing file yields an empty collection, and so does an unreadable
    /// or unparsable one. Read and parse failures are logged and swallowed.
    pub async fn load(&self) -> Vec<ScoreRecord> {
        let content = match fs::read(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to read store file '{}': {e}",
                    self.path.display()
                ));
                return Vec::new();
            }
        };

        match serde_json::from_slice(&content) {
            Ok(records) => records,
            Err(e) => {
                logger::log_warning(&format!(
                    "Failed to parse store file '{}': {e}",
                    self.path.display()
                ));
                Vec::new()
            }
        }
    }

    /// Read all records, sorted descending by score
    ///
    /// Equal scores keep their stored order (stable sort).
    pub async fn list_ranked(&self) -> Vec<ScoreRecord> {
        let mut records = self.load().await;
        sort_descending(&mut records);
        records
    }

    /// Append one record, re-rank, truncate, and persist
    ///
    /// The payload is coerced first: a missing name falls back to the
    /// configured placeholder, a missing score to 0. The store file is
    /// rewritten in full on success. Returns the record as stored.
    pub async fn submit(&self, payload: SubmitPayload) -> Result<ScoreRecord, String> {
        let record = payload.into_record(&self.placeholder_name);

        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await;
        records.push(record.clone());
        sort_descending(&mut records);
        records.truncate(self.max_entries);
        self.save(&records).await?;

        Ok(record)
    }

    /// Overwrite the store file with the given records
    async fn save(&self, records: &[ScoreRecord]) -> Result<(), String> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| format!("Failed to serialize highscores: {e}"))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    format!("Failed to create store directory '{}': {e}", parent.display())
                })?;
            }
        }

        fs::write(&self.path, content).await.map_err(|e| {
            format!("Failed to write store file '{}': {e}", self.path.display())
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Stable sort, highest score first
fn sort_descending(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn test_store(max_entries: usize) -> ScoreStore {
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "arcade-store-test-{}-{id}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        ScoreStore {
            path,
            max_entries,
            placeholder_name: "Player".to_string(),
            write_lock: Mutex::new(()),
        }
    }

    fn payload(name: &str, score: i64) -> SubmitPayload {
        SubmitPayload {
            name: Some(name.to_string()),
            score: Some(score),
        }
    }

    fn record(name: &str, score: i64) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score,
        }
    }

    fn cleanup(store: &ScoreStore) {
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_list() {
        let store = test_store(100);
        assert!(store.list_ranked().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_empty_list() {
        let store = test_store(100);
        std::fs::write(store.path(), b"not json at all").expect("test file write");
        assert!(store.list_ranked().await.is_empty());
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_submit_then_list_is_sorted_descending() {
        let store = test_store(100);
        store.submit(payload("Ann", 10)).await.expect("submit");
        store.submit(payload("Bo", 20)).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(records, vec![record("Bo", 20), record("Ann", 10)]);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_list_ranked_is_idempotent() {
        let store = test_store(100);
        store.submit(payload("Ann", 10)).await.expect("submit");
        store.submit(payload("Bo", 20)).await.expect("submit");

        let first = store.list_ranked().await;
        let second = store.list_ranked().await;
        assert_eq!(first, second);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_duplicate_submissions_are_both_kept() {
        let store = test_store(100);
        store.submit(payload("Cy", 5)).await.expect("submit");
        store.submit(payload("Cy", 5)).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(records, vec![record("Cy", 5), record("Cy", 5)]);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_equal_scores_keep_stored_order() {
        let store = test_store(100);
        store.submit(payload("First", 5)).await.expect("submit");
        store.submit(payload("Second", 5)).await.expect("submit");
        store.submit(payload("Top", 9)).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(
            records,
            vec![record("Top", 9), record("First", 5), record("Second", 5)]
        );
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_low_score_beyond_capacity_is_dropped() {
        let store = test_store(3);
        store.submit(payload("A", 30)).await.expect("submit");
        store.submit(payload("B", 20)).await.expect("submit");
        store.submit(payload("C", 10)).await.expect("submit");

        let before = store.list_ranked().await;
        store.submit(payload("Late", 1)).await.expect("submit");

        assert_eq!(store.list_ranked().await, before);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_high_score_beyond_capacity_evicts_lowest() {
        let store = test_store(3);
        store.submit(payload("A", 30)).await.expect("submit");
        store.submit(payload("B", 20)).await.expect("submit");
        store.submit(payload("C", 10)).await.expect("submit");
        store.submit(payload("New", 25)).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(
            records,
            vec![record("A", 30), record("New", 25), record("B", 20)]
        );
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_empty_payload_stores_placeholder_record() {
        let store = test_store(100);
        store.submit(SubmitPayload::default()).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(records, vec![record("Player", 0)]);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_file_is_stored_sorted() {
        let store = test_store(100);
        store.submit(payload("Low", 1)).await.expect("submit");
        store.submit(payload("High", 9)).await.expect("submit");

        // Raw load without re-sorting reflects the order on disk
        let stored = store.load().await;
        assert_eq!(stored, vec![record("High", 9), record("Low", 1)]);
        cleanup(&store);
    }

    #[tokio::test]
    async fn test_negative_scores_sort_last() {
        let store = test_store(100);
        store.submit(payload("Minus", -5)).await.expect("submit");
        store.submit(payload("Zero", 0)).await.expect("submit");

        let records = store.list_ranked().await;
        assert_eq!(records, vec![record("Zero", 0), record("Minus", -5)]);
        cleanup(&store);
    }
}
