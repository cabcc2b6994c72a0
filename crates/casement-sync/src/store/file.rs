//! JSON file backed position store.
//!
//! The whole record set is rewritten on every save. Writes are atomic
//! (write to `.tmp`, then rename) so a crash mid-write leaves the previous
//! file intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use casement_common::{Rect, StoreError};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{PersistedPosition, PositionStore};

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    positions: Vec<PersistedPosition>,
}

pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, Rect>>,
}

impl JsonFileStore {
    /// `<data dir>/casement/positions.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("casement").join("positions.json"))
    }

    /// Open the store at `path`, loading existing records if the file exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No position file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        tracing::debug!(path = %path.display(), records = records.len(), "Opened position store");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &BTreeMap<String, Rect>) -> Result<(), StoreError> {
        let file = StoreFile {
            positions: records
                .iter()
                .map(|(window_type, rect)| PersistedPosition {
                    window_type: window_type.clone(),
                    rect: *rect,
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            // Rename over an open file can fail on Windows.
            tracing::warn!(error = %e, "atomic rename failed, falling back to direct write");
            tokio::fs::write(&self.path, &json).await?;
            let _ = tokio::fs::remove_file(&tmp_path).await;
        }
        Ok(())
    }
}

fn parse(content: &str) -> Result<BTreeMap<String, Rect>, StoreError> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let file: StoreFile =
        serde_json::from_str(content).map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(file
        .positions
        .into_iter()
        .filter(|p| !p.window_type.is_empty())
        .map(|p| (p.window_type, p.rect))
        .collect())
}

#[async_trait]
impl PositionStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<PersistedPosition>, StoreError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .map(|(window_type, rect)| PersistedPosition {
                window_type: window_type.clone(),
                rect: *rect,
            })
            .collect())
    }

    async fn save(&self, window_type: &str, rect: Rect) -> Result<(), StoreError> {
        if window_type.is_empty() {
            return Ok(());
        }
        let mut records = self.records.lock().await;
        if records.get(window_type) == Some(&rect) {
            return Ok(());
        }
        let previous = records.insert(window_type.to_string(), rect);
        if let Err(e) = self.flush(&records).await {
            // Keep memory in step with what is on disk.
            match previous {
                Some(old) => records.insert(window_type.to_string(), old),
                None => records.remove(window_type),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("positions.json"))
            .await
            .unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("positions.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.save("Untitled 2", Rect::new(620, 100, 1120, 400)).await.unwrap();
        store.save("Untitled 1", Rect::new(100, 100, 500, 400)).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let all = reopened.load_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].window_type, "Untitled 1");
        assert_eq!(all[1].rect, Rect::new(620, 100, 1120, 400));
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.save("Untitled 1", Rect::new(0, 0, 10, 10)).await.unwrap();
        store.save("Untitled 1", Rect::new(1, 1, 11, 11)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("Untitled 1").count(), 1);
        let all = store.load_all().await.unwrap();
        assert_eq!(all, vec![PersistedPosition {
            window_type: "Untitled 1".into(),
            rect: Rect::new(1, 1, 11, 11),
        }]);
    }

    #[tokio::test]
    async fn failed_write_leaves_records_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join("state");
        let path = state_dir.join("positions.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.save("Untitled 1", Rect::new(0, 0, 10, 10)).await.unwrap();

        // Replace the directory with a plain file so the next write fails.
        std::fs::remove_dir_all(&state_dir).unwrap();
        std::fs::write(&state_dir, "not a directory").unwrap();

        assert!(store.save("Untitled 1", Rect::new(5, 5, 50, 50)).await.is_err());
        assert!(store.save("Untitled 2", Rect::new(1, 1, 2, 2)).await.is_err());

        let all = store.load_all().await.unwrap();
        assert_eq!(all, vec![PersistedPosition {
            window_type: "Untitled 1".into(),
            rect: Rect::new(0, 0, 10, 10),
        }]);
    }

    #[tokio::test]
    async fn empty_type_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.save("", Rect::new(0, 0, 10, 10)).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::open(&path).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn no_tmp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.save("a", Rect::new(0, 0, 1, 1)).await.unwrap();
        assert!(!dir.path().join("positions.json.tmp").exists());
        assert_eq!(store.path(), path.as_path());
    }
}
