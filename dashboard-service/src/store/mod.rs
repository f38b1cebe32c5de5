use std::sync::Arc;

use time::Date;
use usage_client::domain::DailyMetricRecord;

use crate::config::{StoreConfig, StoreKind};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMetricStore;
pub use postgres::PgMetricStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("store query error: {0}")]
    Query(String),
    #[error("store seed error: {0}")]
    Seed(String),
}

/// Read-only view of the externally populated daily metrics.
#[async_trait::async_trait]
pub trait MetricStore: Send + Sync {
    async fn find_one(&self, date: Date, home_id: &str) -> Result<Option<DailyMetricRecord>, StoreError>;

    async fn distinct_home_ids(&self) -> Result<Vec<String>, StoreError>;

    /// Releases the underlying handle. Called once at shutdown.
    async fn close(&self) {}
}

/// Opens the configured backend.
pub async fn open(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn MetricStore>> {
    let store: Arc<dyn MetricStore> = match cfg.kind {
        StoreKind::Postgres => Arc::new(PgMetricStore::open(cfg).await?),
        StoreKind::Memory => match &cfg.seed_path {
            Some(path) => Arc::new(InMemoryMetricStore::from_ndjson_file(path).await?),
            None => Arc::new(InMemoryMetricStore::new()),
        },
    };
    Ok(store)
}
