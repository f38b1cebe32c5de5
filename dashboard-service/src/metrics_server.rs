use axum::{extract::State, routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static PROM_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Installs the global Prometheus recorder on first use and returns its handle.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    PROM_HANDLE
        .get_or_try_init(|| {
            PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| anyhow::anyhow!("failed to install Prometheus metrics recorder: {e}"))
        })
        .cloned()
}

/// `/metrics` route, meant to be merged into the dashboard router.
pub fn routes() -> anyhow::Result<Router> {
    let handle = install()?;
    Ok(Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(handle))
}

async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
