use anyhow::Result;
use dashboard_service::{
    config::AppConfig,
    metrics_server,
    observability,
    server::{self, AppState},
    store,
    DataAccessor,
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing(observability::SERVER_DIRECTIVE);

    // Load configuration
    let cfg = AppConfig::load()?;

    // The store handle lives for the whole process and is closed on the way out.
    let metric_store = store::open(&cfg.store).await?;
    let accessor = DataAccessor::new(metric_store.clone());

    let home_ids = accessor.home_ids().await?;
    tracing::info!(homes = home_ids.len(), "household selector populated");

    let mut app = server::router(AppState::new(accessor, home_ids, cfg.dashboard.min_date));
    if cfg.metrics_enabled() {
        app = app.merge(metrics_server::routes()?);
    }

    let addr: SocketAddr = cfg
        .http
        .bind_addr
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid http.bind_addr: {e}"))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "dashboard listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    metric_store.close().await;
    tracing::info!("dashboard stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
