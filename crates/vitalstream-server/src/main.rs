//! Vitalstream server entry point.
//!
//! Boots the simulated-vitals engine, starts the background schedulers
//! (fleet generation and retention), and serves the REST API plus the
//! WebSocket stream until ctrl-c.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use vitalstream_server::{create_router, AppState, SchedulerConfig};

#[derive(Parser, Debug)]
#[command(name = "vitalstream-server", about = "Simulated vital-signs streaming server")]
struct Args {
    /// HTTP port for the REST API and WebSocket stream
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Seconds between readings on a live connection
    #[arg(long, default_value = "10")]
    emission_secs: u64,

    /// Seconds between fleet generation cycles
    #[arg(long, default_value = "10")]
    generation_secs: u64,

    /// Seconds between scheduled retention purges
    #[arg(long, default_value = "3600")]
    retention_period_secs: u64,

    /// Retention window in hours
    #[arg(long, default_value = "1")]
    retention_hours: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();

    let state = AppState::with_config(SchedulerConfig {
        emission_period: Duration::from_secs(args.emission_secs),
        generation_period: Duration::from_secs(args.generation_secs),
        retention_period: Duration::from_secs(args.retention_period_secs),
        retention_hours: args.retention_hours,
    });

    state.start_schedulers();

    let app = create_router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "vitalstream server listening");
    info!("WebSocket stream: ws://{addr}/ws/vitals");
    info!("Status API:       http://{addr}/api/v1/vitals/status");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    state.stop_schedulers();
    info!("server closed");
    Ok(())
}
