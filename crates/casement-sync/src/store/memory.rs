use std::collections::BTreeMap;

use async_trait::async_trait;
use casement_common::{Rect, StoreError};
use tokio::sync::Mutex;

use super::{PersistedPosition, PositionStore};

/// Non-durable store, for `backend = "memory"` and tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, Rect>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = PersistedPosition>) -> Self {
        Self {
            records: Mutex::new(
                records
                    .into_iter()
                    .filter(|p| !p.window_type.is_empty())
                    .map(|p| (p.window_type, p.rect))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
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
        self.records.lock().await.insert(window_type.to_string(), rect);
        Ok(())
    }
}
