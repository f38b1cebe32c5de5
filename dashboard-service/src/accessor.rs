use std::sync::Arc;

use time::Date;
use usage_client::domain::DailyMetricRecord;

use crate::store::MetricStore;

/// The single absence signal handed to callers. A missing record and a failed
/// lookup both end up here.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("no daily metrics for home '{home_id}' on {date}")]
pub struct NotFound {
    pub date: Date,
    pub home_id: String,
}

pub type Lookup = Result<DailyMetricRecord, NotFound>;

#[derive(Clone)]
pub struct DataAccessor {
    store: Arc<dyn MetricStore>,
}

impl DataAccessor {
    pub fn new(store: Arc<dyn MetricStore>) -> Self {
        Self { store }
    }

    /// Point lookup by `(date, home_id)`.
    pub async fn fetch(&self, date: Date, home_id: &str) -> Lookup {
        metrics::counter!("dashboard_lookups_total").increment(1);

        let not_found = || NotFound {
            date,
            home_id: home_id.to_string(),
        };

        match self.store.find_one(date, home_id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                metrics::counter!("dashboard_lookup_not_found_total").increment(1);
                tracing::debug!(%date, home_id, "no daily metrics");
                Err(not_found())
            }
            Err(e) => {
                // Reported to callers exactly like a missing record.
                metrics::counter!("dashboard_lookup_faults_total").increment(1);
                tracing::warn!(error = %e, %date, home_id, "daily metrics lookup failed");
                Err(not_found())
            }
        }
    }

    /// Household enumeration for the selector. Unlike `fetch`, errors surface.
    pub async fn home_ids(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.store.distinct_home_ids().await?)
    }
}
