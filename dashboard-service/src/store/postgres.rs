use sqlx::postgres::{PgPool, PgPoolOptions};
use time::Date;
use usage_client::{db, domain::DailyMetricRecord};

use super::{MetricStore, StoreError};
use crate::config::StoreConfig;

/// Postgres-backed store. The pool is opened once and shared by every lookup.
pub struct PgMetricStore {
    pool: PgPool,
}

impl PgMetricStore {
    pub async fn open(cfg: &StoreConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect(&cfg.uri)
            .await?;
        tracing::info!(max_connections = cfg.max_connections, "metric store pool opened");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MetricStore for PgMetricStore {
    async fn find_one(&self, date: Date, home_id: &str) -> Result<Option<DailyMetricRecord>, StoreError> {
        db::fetch_daily_metrics(&self.pool, date, home_id)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn distinct_home_ids(&self) -> Result<Vec<String>, StoreError> {
        db::distinct_home_ids(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("metric store pool closed");
    }
}
