use serde::{Deserialize, Serialize};

/// Listening endpoint for client connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Socket path clients must request. A trailing slash is tolerated.
    pub path: String,
    /// Per-connection read timeout in seconds. 0 disables it.
    pub idle_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 5000,
            path: "/ws".into(),
            idle_timeout_secs: 300,
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
