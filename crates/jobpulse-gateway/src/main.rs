use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use jobpulse_core::config::{GatewayConfig, JobpulseConfig};
use jobpulse_ingest::{FetchClient, IngestPipeline};
use jobpulse_scheduler::SchedulerEngine;
use jobpulse_store::SqliteListingStore;
use tracing::info;

mod app;
mod http;

const DEFAULT_LOG_FILTER: &str =
    "jobpulse_gateway=info,jobpulse_ingest=info,jobpulse_scheduler=info,tower_http=debug";

#[derive(Parser, Debug)]
#[command(name = "jobpulse-gateway", version, about = "Job listing ingestion and read API")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "JOBPULSE_CONFIG")]
    config: Option<String>,

    /// Start the cadences without the initial full crawl.
    #[arg(long)]
    skip_bootstrap: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    // load config: --config > JOBPULSE_CONFIG env > ./jobpulse.toml
    let cli = Cli::parse();
    let config = JobpulseConfig::load(cli.config.as_deref())?;

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL;")?;
    let store = Arc::new(SqliteListingStore::new(db)?);
    info!("database migrations complete");

    let source = FetchClient::from_config(&config.ingest)?;
    let pipeline = Arc::new(IngestPipeline::new(
        Arc::new(source),
        store.clone(),
        config.ingest.clone(),
    ));

    // the read API only opens once the bootstrap sweep has committed
    if cli.skip_bootstrap {
        info!("bootstrap skipped");
    } else {
        pipeline.bootstrap().await;
    }

    let mut engine = SchedulerEngine::new();
    jobpulse_ingest::register_cadences(&mut engine, Arc::clone(&pipeline), &config.schedule);
    let scheduler = engine.handle();

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let engine_task = tokio::spawn(engine.run(shutdown_rx));

    let addr = listen_addr(&config.gateway)?;
    let state = Arc::new(app::AppState::new(
        config,
        store,
        pipeline.buffer(),
        scheduler,
    ));
    let router = app::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("jobpulse gateway listening on {}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // signal the cadences to stop and let an in-flight tick finish
    let _ = shutdown_tx.send(true);
    let _ = engine_task.await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    info!("ctrl-c received, shutting down");
}

/// Socket address for the HTTP listener. `bind` may be an IPv4 or IPv6 literal.
fn listen_addr(gateway: &GatewayConfig) -> anyhow::Result<SocketAddr> {
    let ip: IpAddr = gateway
        .bind
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid gateway.bind {:?}: {e}", gateway.bind))?;
    Ok(SocketAddr::new(ip, gateway.port))
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
}
