use std::path::PathBuf;

use crate::types::WindowHandle;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window not found: {0}")]
    WindowNotFound(WindowHandle),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("spawn failed: {0}")]
    SpawnFailed(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("window manager error: {0}")]
    WindowManagerError(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CasementError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("app.max_instances must be >= 1".into());
        assert_eq!(
            err.to_string(),
            "config validation error: app.max_instances must be >= 1"
        );
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::WindowNotFound(WindowHandle(0x1a2b));
        assert_eq!(err.to_string(), "window not found: 1A2B");

        let err = PlatformError::AccessDenied("pid 42".into());
        assert_eq!(err.to_string(), "access denied: pid 42");

        let err = PlatformError::Timeout("main window of pid 7".into());
        assert_eq!(err.to_string(), "timed out: main window of pid 7");

        let err = PlatformError::NotSupported("linux".into());
        assert_eq!(err.to_string(), "not supported: linux");
    }

    #[test]
    fn casement_error_from_platform() {
        let platform_err = PlatformError::SpawnFailed("notepad.exe".into());
        let err: CasementError = platform_err.into();
        assert!(matches!(err, CasementError::Platform(_)));
        assert!(err.to_string().contains("notepad.exe"));
    }

    #[test]
    fn casement_error_from_store() {
        let store_err = StoreError::Serialization("trailing comma".into());
        let err: CasementError = store_err.into();
        assert!(matches!(err, CasementError::Store(_)));
        assert!(err.to_string().contains("trailing comma"));
    }

    #[test]
    fn casement_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");
        let err: CasementError = io_err.into();
        assert!(matches!(err, CasementError::Io(_)));
        assert!(err.to_string().contains("port taken"));
    }

    #[test]
    fn casement_error_other_variants() {
        let err = CasementError::Network("handshake failed".into());
        assert_eq!(err.to_string(), "network error: handshake failed");

        let err = CasementError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
