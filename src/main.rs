use energy_tracker::{AppState, Config, router};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    info!(
        read_url = %config.read_url,
        write_url = %config.write_url,
        read_only = config.is_using_default_read_only_endpoint,
        "resolved energy endpoints"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let refetch_interval = config.refetch_interval;
    let state = AppState::new(config)?;
    let refresher = state.cache.spawn_periodic_refresh(refetch_interval);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    refresher.abort();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
