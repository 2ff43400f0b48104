use anyhow::Result;
use billflow_service::{api, config::AppConfig, metrics_server, observability, AppState};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    // Load configuration
    let cfg = AppConfig::load()?;

    // Start metrics server if configured
    if let Some(metrics_cfg) = &cfg.metrics {
        metrics_server::init(&metrics_cfg.bind_addr)?;
    }

    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server.bind_addr: {e}"))?;

    let state = AppState::from_config(&cfg)?;
    match state.store.load().await {
        Ok(ds) => tracing::info!(
            electricity = ds.electricity.len(),
            cold_water = ds.cold_water.len(),
            hot_water = ds.hot_water.len(),
            "dataset loaded"
        ),
        Err(e) if e.is_not_found() => {
            tracing::info!(path = %cfg.store.data_path.display(), "no data file yet, starting empty")
        }
        Err(e) => tracing::warn!(error = %e, "data file unreadable, requests will fail until it is fixed"),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "billflow listening");
    axum::serve(listener, api::router(state).into_make_service()).await?;

    Ok(())
}
