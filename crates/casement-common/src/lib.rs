pub mod errors;
pub mod events;
pub mod types;

pub use errors::{CasementError, ConfigError, PlatformError, StoreError};
pub use events::{EventBus, SyncEvent};
pub use types::{ProcessId, Rect, WindowHandle};

pub type Result<T> = std::result::Result<T, CasementError>;
