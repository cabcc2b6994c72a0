//! Configuration schema types for casement.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod app;
mod server;
mod store;
mod system;

pub use app::*;
pub use server::*;
pub use store::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CasementConfig {
    pub server: ServerConfig,
    pub app: ManagedAppConfig,
    pub sync: SyncConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}
