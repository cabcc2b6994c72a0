//! WebSocket endpoint: accepts clients and wires each one to the
//! synchronizer.

mod connection;


use std::sync::Arc;
use std::time::Duration;

use casement_config::ServerConfig;
use casement_sync::Synchronizer;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;

use self::connection::handle_connection;

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Request path clients must use.
    pub path: String,
    /// Close a connection after this long without an inbound frame.
    pub idle_timeout: Option<Duration>,
}

impl GatewaySettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            path: config.path.clone(),
            idle_timeout: (config.idle_timeout_secs > 0)
                .then(|| Duration::from_secs(config.idle_timeout_secs)),
        }
    }
}

/// Accept loop. Runs until the task is dropped.
pub async fn serve(listener: TcpListener, sync: Arc<Synchronizer>, settings: GatewaySettings) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let sync = sync.clone();
                let settings = settings.clone();
                tokio::spawn(async move {
                    let expected = settings.path.clone();
                    let check_path = move |req: &Request, resp: Response| {
                        if path_matches(req.uri().path(), &expected) {
                            Ok(resp)
                        } else {
                            tracing::debug!(peer = %addr, path = req.uri().path(), "Rejected path");
                            Err(not_found())
                        }
                    };
                    match accept_hdr_async(stream, check_path).await {
                        Ok(ws) => handle_connection(ws, addr, sync, settings.idle_timeout).await,
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

fn path_matches(requested: &str, expected: &str) -> bool {
    requested.trim_end_matches('/') == expected.trim_end_matches('/')
}

fn not_found() -> ErrorResponse {
    let mut resp = ErrorResponse::new(Some("not found".into()));
    *resp.status_mut() = StatusCode::NOT_FOUND;
    resp
}
