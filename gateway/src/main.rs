//! RandLedger gateway server binary

use chain_core::{spawn_publisher, Config, LedgerService};
use randledger_gateway::{create_router, AppState};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match std::env::var("RANDLEDGER_CONFIG") {
        Ok(path) => Config::from_file(path)?,
        Err(_) => Config::from_env()?,
    };

    info!(data_dir = %config.data_dir.display(), "starting randledger gateway");

    // Open the ledger (reconstructs the chain from persisted blocks)
    let service = LedgerService::open(&config)?;

    // Start the periodic publish scheduler
    spawn_publisher(
        service.clone(),
        Duration::from_secs(config.publish.interval_secs),
    );

    let state = AppState {
        service,
        limits: config.limits.clone(),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_listen_addr).await?;
    info!("gateway listening on {}", config.http_listen_addr);
    info!("   GET /randomnumber - generate audited random values");
    info!("   GET /getblock     - fetch a sealed block by id");
    info!("   GET /health       - health check");
    info!("   GET /metrics      - Prometheus metrics");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
