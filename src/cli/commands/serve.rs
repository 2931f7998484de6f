use clap::Args;
use std::net::SocketAddr;

use crate::app;
use crate::config::config;
use crate::state::AppState;
use crate::types::ServiceRole;

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(value_enum, help = "Service to run")]
    pub role: ServiceRole,

    #[arg(long, help = "Port to listen on (overrides PORT and the role default)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config().clone();
    let port = args
        .port
        .or(config.server.port)
        .unwrap_or_else(|| args.role.default_port());
    let addr: SocketAddr = format!("{}:{}", config.server.bind_addr, port).parse()?;

    tracing::info!("Starting {} service in {:?} mode", args.role, config.environment);

    let state = AppState::build(config)?;
    let router = app::router(args.role, state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Museum CMS {} listening on http://{}", args.role, listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("{} service stopped", args.role);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
