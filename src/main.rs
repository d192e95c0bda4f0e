//! tiered-kv server binary.
//!
//! Wires the pieces together: CLI → config → tracing → tier manager → axum.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tiered_kv::cache::manager::new_shared_manager;
use tiered_kv::config::{Cli, Config};
use tiered_kv::server::api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments.
    let cli = Cli::parse();

    // Initialize tracing/logging.
    let filter = if cli.verbose {
        "tiered_kv=debug,tower_http=debug"
    } else {
        "tiered_kv=info,tower_http=info"
    };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }

    info!("tiered-kv v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration.
    let mut config = Config::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    config.validate()?;
    let config = Arc::new(config);

    info!(
        hot_capacity = config.tiers.hot_capacity,
        warm_capacity = config.tiers.warm_capacity,
        demote_watermark = config.tiers.demote_watermark,
        max_value_bytes = config.limits.max_value_bytes,
        "Tier configuration"
    );

    // Initialize the tier manager.
    let manager = new_shared_manager::<Bytes>(&config.tiers)?;

    // Build application state.
    let state = Arc::new(AppState {
        manager,
        config: config.clone(),
        start_time: Instant::now(),
    });

    // Build the HTTP router.
    let app = build_router(state);

    // Start the server.
    let listen_addr = config.server.listen.clone();
    info!(addr = listen_addr, "Starting server");

    let listener = TcpListener::bind(&listen_addr).await?;
    info!("Listening on {listen_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
