//! casement: window state synchronization server.
//!
//! Tracks the managed application's windows, persists their geometry and
//! pushes every change to connected WebSocket clients, which in turn may
//! open, move and close instances.

mod cli;
mod gateway;
mod protocol;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use casement_common::CasementError;
use casement_config::CasementConfig;
use casement_platform::{LifecycleSettings, ProcessLifecycle};
use casement_sync::{SyncSettings, Synchronizer};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::gateway::GatewaySettings;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    let mut config = match casement_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("casement: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if args.print_config {
        return match casement_config::config_to_toml(&config) {
            Ok(toml) => {
                print!("{toml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("casement: {e}");
                ExitCode::FAILURE
            }
        };
    }

    init_logging(args.log_level.as_deref(), &config);
    tracing::info!("casement v{} starting...", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins, then `--log-level`, then `[logging].level`.
fn init_logging(cli_level: Option<&str>, config: &CasementConfig) {
    let level = cli_level.unwrap_or(config.logging.level.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(format!("casement={level}"))
            .unwrap_or_else(|_| EnvFilter::new("casement=info"))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: CasementConfig) -> Result<(), CasementError> {
    let store = casement_sync::create_store(&config.store).await?;
    let lifecycle = ProcessLifecycle::new(
        casement_platform::create_process_control(),
        LifecycleSettings {
            spawn_timeout: Duration::from_millis(config.app.spawn_timeout_ms),
            close_grace: Duration::from_millis(config.app.close_grace_ms),
        },
    );
    let sync = Arc::new(Synchronizer::new(
        casement_platform::create_window_directory(),
        lifecycle,
        store,
        SyncSettings::from_config(&config),
    ));
    tracing::info!(
        executable = %config.app.executable,
        max_instances = config.app.max_instances,
        "Synchronizer ready"
    );

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CasementError::Network(format!("failed to bind {addr}: {e}")))?;
    tracing::info!("casement listening on ws://{}{}", addr, config.server.path);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = tokio::spawn(sync.clone().run(shutdown_rx));

    tokio::select! {
        _ = gateway::serve(listener, sync, GatewaySettings::from_config(&config.server)) => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                tracing::warn!(error = %e, "Could not listen for Ctrl-C");
            }
            tracing::info!("Shutdown requested");
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        tracing::warn!(error = %e, "Poll loop ended abnormally");
    }
    Ok(())
}
