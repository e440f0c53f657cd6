//! Development gateway binary.
//!
//! Serves the x402 contract backed by the in-memory reference ledger, with
//! the settlement account seeded so winning payouts settle. Configuration
//! comes from the environment:
//!
//! - `FLIPCORE_LISTEN`      listen address (default `0.0.0.0:8080`)
//! - `FLIPCORE_RECIPIENT`   payment recipient / settlement account
//! - `FLIPCORE_DEV_PLAYER`  optional player address to seed with funds
//!
//! Production deployments swap the ledger for a chain-backed
//! `SettlementLedger` implementation; everything else is unchanged.

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flipcore_engine::SettlementOrchestrator;
use flipcore_gateway::{AppState, router};
use flipcore_ledger::InMemoryLedger;
use flipcore_types::{Address, EngineConfig, FlipcoreError, Result, TokenAmount, constants};

/// Placeholder recipient for local runs only.
const DEV_RECIPIENT: &str = "0xea55e1a310202453685d91dcf654db9d38a286a3";

/// Dev float: 2000 asset units and 1 native unit for the settlement account.
const DEV_HOUSE_ASSET: u128 = 2_000_000_000;
const DEV_HOUSE_NATIVE: u128 = 1_000_000_000_000_000_000;
const DEV_PLAYER_ASSET: u128 = 100_000_000;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(error = %err, "gateway terminated with error");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let recipient: Address = std::env::var("FLIPCORE_RECIPIENT")
        .unwrap_or_else(|_| DEV_RECIPIENT.to_string())
        .parse()?;
    let config = Arc::new(EngineConfig::base_usdc(recipient));
    config.validate()?;

    let ledger = InMemoryLedger::new(recipient, config.gas_reserve_floor);
    ledger.credit_asset(recipient, TokenAmount(DEV_HOUSE_ASSET));
    ledger.credit_native(recipient, TokenAmount(DEV_HOUSE_NATIVE));
    if let Ok(player) = std::env::var("FLIPCORE_DEV_PLAYER") {
        let player: Address = player.parse()?;
        ledger.credit_asset(player, TokenAmount(DEV_PLAYER_ASSET));
        info!(player = %player, "seeded dev player balance");
    }

    let orchestrator = Arc::new(SettlementOrchestrator::new(Arc::clone(&config), ledger)?);
    let app = router(AppState { orchestrator });

    let listen = std::env::var("FLIPCORE_LISTEN")
        .unwrap_or_else(|_| format!("0.0.0.0:{}", constants::DEFAULT_API_PORT));
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| FlipcoreError::Internal(format!("bind {listen}: {e}")))?;
    info!(
        %listen,
        recipient = %recipient,
        network = %config.network,
        version = constants::VERSION,
        "flipcore gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FlipcoreError::Internal(format!("server error: {e}")))?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
