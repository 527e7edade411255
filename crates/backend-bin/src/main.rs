use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use warden_backend_lib::{
    config::{LogFormat, Settings},
    router,
    storage::FlatFileUserStore,
    AppState,
};

/// Multi-tenant API server with token auth, throttling and ownership checks
#[derive(Debug, Parser)]
#[command(name = "warden", version)]
struct Args {
    /// Path to a TOML config file (defaults to config/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address from the config
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match settings.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load settings")?;

    init_tracing(&settings);

    let storage = FlatFileUserStore::new(&settings.storage.path)
        .with_context(|| format!("failed to open storage at {}", settings.storage.path.display()))?;
    let state = Arc::new(AppState::new(storage, &settings)?);
    let app = router::create_router(state);

    let addr = match args.bind {
        Some(addr) => addr,
        None => settings.bind_addr()?,
    };
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
