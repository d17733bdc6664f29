use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use rc_core::ports::{KeyValueStorePort, StoreError, StoredEntry};

type Entries = BTreeMap<String, String>;

/// Key-value store backed by a single JSON object on disk.
///
/// Each key maps to the serialized text stored under it. Writes rewrite the
/// whole file through a temporary sibling followed by a rename. A corrupt
/// file is moved to `*.json.corrupt` by the next write.
pub struct FileKeyValueStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing, starting empty");
                return Ok(Entries::new());
            }
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "read store failed: {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Corrupt(format!("parse store failed: {}: {}", self.path.display(), e))
        })
    }

    /// Move an unreadable store file aside so the next write starts fresh.
    async fn quarantine(&self, reason: &str) {
        let backup = self.path.with_extension("json.corrupt");
        match fs::rename(&self.path, &backup).await {
            Ok(()) => warn!(
                reason,
                backup = %backup.display(),
                "store file corrupt, moved aside"
            ),
            Err(e) => warn!(reason, error = %e, "store file corrupt, overwriting"),
        }
    }

    async fn atomic_write(&self, content: &str) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create store dir failed: {}", dir.display()))?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp store failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp store to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, keys: &[&str]) -> Result<Vec<StoredEntry>, StoreError> {
        let entries = self.read_entries().await?;
        Ok(keys
            .iter()
            .map(|key| StoredEntry::new(*key, entries.get(*key).cloned()))
            .collect())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            Err(StoreError::Corrupt(reason)) => {
                self.quarantine(&reason).await;
                Entries::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| StoreError::Io(format!("serialize store failed: {}", e)))?;
        self.atomic_write(&content)
            .await
            .map_err(|e| StoreError::Io(format!("{:#}", e)))?;

        debug!(key, path = %self.path.display(), "store file updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("store.json"));

        let entries = store.get(&["state"]).await.unwrap();
        assert_eq!(entries, vec![StoredEntry::new("state", None)]);
    }

    #[tokio::test]
    async fn set_then_get_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        FileKeyValueStore::new(&path)
            .set("viewStatus", r#"{"hasSeenIntro":true}"#)
            .await
            .unwrap();
        FileKeyValueStore::new(&path)
            .set("state", r#"{"rollsCount":1}"#)
            .await
            .unwrap();

        let entries = FileKeyValueStore::new(&path)
            .get(&["state", "viewStatus"])
            .await
            .unwrap();
        assert_eq!(entries[0].text(), Some(r#"{"rollsCount":1}"#));
        assert_eq!(entries[1].text(), Some(r#"{"hasSeenIntro":true}"#));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = FileKeyValueStore::new(&path)
            .get(&["state"])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[tokio::test]
    async fn write_after_corruption_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileKeyValueStore::new(&path);

        store.set("state", "{}").await.unwrap();
        store.set("viewStatus", r#"{"hasSeenIntro":true}"#).await.unwrap();

        let entries = store.get(&["state", "viewStatus"]).await.unwrap();
        assert_eq!(entries[0].text(), Some("{}"));
        assert_eq!(entries[1].text(), Some(r#"{"hasSeenIntro":true}"#));
        assert_eq!(
            std::fs::read_to_string(path.with_extension("json.corrupt")).unwrap(),
            "{ not json"
        );
    }
}
