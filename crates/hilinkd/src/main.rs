//! hilinkd - Hi-Link Mode2 Bridge Daemon
//!
//! HTTP gateway in front of the Hi-Link Mode2 request/response queues.
//!
//! Usage:
//!   hilinkd [config.toml]
//!
//! Environment:
//!   HILINK_SERIAL           Vendor activation serial number
//!   BRIDGE_ALLOW_CONTROL    Set to `true` to enable control-class requests
//!   BRIDGE_PORT             Listening port (default 5005)
//!
//! If no config file is provided, a simulated fleet is used for demo purposes.

mod config;

use std::sync::Arc;

use anyhow::Context;
use hilink_api::{create_router, AppState};
use hilink_core::AccessPolicy;
use hilink_mode2::{create_transport, Mode2Client};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::BridgeConfig;

/// Parsed command-line arguments
struct Args {
    /// Bridge config file (TOML)
    config_path: Option<String>,
}

fn parse_args() -> Args {
    let mut result = Args { config_path: None };

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            a if !a.starts_with('-') => result.config_path = Some(arg),
            _ => tracing::warn!("Unknown argument: {}", arg),
        }
    }

    result
}

fn print_help() {
    eprintln!(
        r#"hilinkd - Hi-Link Mode2 Bridge Daemon

Usage: hilinkd [config.toml]

Options:
  -h, --help    Print this help message

Environment:
  HILINK_SERIAL          Vendor activation serial number
  BRIDGE_ALLOW_CONTROL   Set to 'true' to enable control-class requests
  BRIDGE_PORT            Listening port (default 5005)
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "hilinkd=info,hilink_api=info,hilink_mode2=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting hilinkd (Hi-Link Mode2 Bridge)");

    let args = parse_args();

    let mut config = if let Some(ref path) = args.config_path {
        tracing::info!("Loading config from: {}", path);
        BridgeConfig::load(path)?
    } else {
        tracing::info!("No config file provided, using simulated fleet");
        BridgeConfig::demo()
    };
    config.apply_env()?;

    if config.serial_number().is_none() {
        tracing::warn!(
            "{} is not set; vendor license activation may fail",
            config::ENV_SERIAL
        );
    }

    let policy = AccessPolicy::new(config.control.allow_control);
    if policy.control_enabled() {
        tracing::warn!("Control API enabled: requests may change machine state");
    } else {
        tracing::info!("Control API disabled: only read-only request kinds are served");
    }

    let queues = create_transport(&config.transport, config.serial_number())
        .context("Failed to create exchange queues")?;
    let client = Mode2Client::connect(queues, config.client.clone())
        .await
        .context("Failed to start correlation client")?;

    tracing::info!(
        raw_read_cooldown_ms = config.rate_limit.raw_read_cooldown_ms,
        reset_cooldown_ms = config.rate_limit.reset_cooldown_ms,
        "Request cooldowns"
    );
    let state = AppState::with_rate_limits(Arc::new(client), policy, &config.rate_limit);
    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hilinkd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
