//! Durable last-known geometry per logical window type.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use casement_common::{Rect, StoreError};
use casement_config::{StoreBackend, StoreConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPosition {
    pub window_type: String,
    pub rect: Rect,
}

#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Every record, ordered by window type.
    async fn load_all(&self) -> Result<Vec<PersistedPosition>, StoreError>;

    /// Insert or overwrite the record for `window_type`. An empty type is
    /// ignored.
    async fn save(&self, window_type: &str, rect: Rect) -> Result<(), StoreError>;
}

/// Build the store selected by `config`.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn PositionStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => {
            let path = match &config.path {
                Some(p) => p.clone(),
                None => JsonFileStore::default_path().ok_or_else(|| {
                    StoreError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "could not determine data directory",
                    ))
                })?,
            };
            Ok(Arc::new(JsonFileStore::open(path).await?))
        }
    }
}
