use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
};

use time::Date;
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
    sync::RwLock,
};
use usage_client::domain::DailyMetricRecord;

use super::{MetricStore, StoreError};

/// Store held in process memory, keyed by `(date, home_id)`.
///
/// Used for local runs against an NDJSON fixture and by tests.
#[derive(Default)]
pub struct InMemoryMetricStore {
    records: RwLock<HashMap<(Date, String), DailyMetricRecord>>,
}

impl InMemoryMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any record already held under the same key.
    pub async fn insert(&self, record: DailyMetricRecord) {
        let key = (record.date, record.home_id.clone());
        self.records.write().await.insert(key, record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Loads one JSON record per line; blank lines are skipped.
    pub async fn from_ndjson_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| StoreError::Seed(format!("failed to open {}: {e}", path.display())))?;
        let mut lines = BufReader::new(file).lines();

        let store = Self::new();
        let mut line_no = 0usize;
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| StoreError::Seed(format!("failed to read seed line: {e}")))?
        {
            line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            let record: DailyMetricRecord = serde_json::from_str(&line).map_err(|e| {
                metrics::counter!("dashboard_seed_parse_errors_total").increment(1);
                StoreError::Seed(format!("line {line_no}: {e}"))
            })?;
            store.insert(record).await;
        }

        tracing::info!(records = store.len().await, path = %path.display(), "memory store seeded");
        Ok(store)
    }
}

#[async_trait::async_trait]
impl MetricStore for InMemoryMetricStore {
    async fn find_one(&self, date: Date, home_id: &str) -> Result<Option<DailyMetricRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&(date, home_id.to_string())).cloned())
    }

    async fn distinct_home_ids(&self) -> Result<Vec<String>, StoreError> {
        let records = self.records.read().await;
        let ids: BTreeSet<&String> = records.keys().map(|(_, home_id)| home_id).collect();
        Ok(ids.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use time::macros::date;

    fn record(date: Date, home_id: &str) -> DailyMetricRecord {
        DailyMetricRecord {
            date,
            home_id: home_id.to_string(),
            water_consumption: vec![3.5, 0.0, 12.25],
            usage: vec![1.0, 0.0, 1.0],
            four_week_usage_norm: vec![40.0, 10.0, 75.0],
            active_score: 42.0,
            correlation_coefficient: 0.61,
            low_norm: 20.0,
            norm_active_score: 45.0,
            high_norm: 70.0,
        }
    }

    #[tokio::test]
    async fn lists_distinct_home_ids_sorted() {
        let store = InMemoryMetricStore::new();
        store.insert(record(date!(2024 - 03 - 02), "home-b")).await;
        store.insert(record(date!(2024 - 03 - 01), "home-a")).await;
        store.insert(record(date!(2024 - 03 - 02), "home-a")).await;

        let ids = store.distinct_home_ids().await.unwrap();
        assert_eq!(ids, vec!["home-a".to_string(), "home-b".to_string()]);
    }

    #[tokio::test]
    async fn insert_replaces_same_key() {
        let store = InMemoryMetricStore::new();
        store.insert(record(date!(2024 - 03 - 01), "home-a")).await;
        let mut updated = record(date!(2024 - 03 - 01), "home-a");
        updated.active_score = 99.0;
        store.insert(updated.clone()).await;

        assert_eq!(store.len().await, 1);
        let found = store.find_one(date!(2024 - 03 - 01), "home-a").await.unwrap();
        assert_eq!(found, Some(updated));
    }

    #[tokio::test]
    async fn seeds_from_ndjson_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"date":"2024-03-01","home_id":"home-a","water_consumption":[1.5,2.0],"usage":[0.0,1.0],"four_week_usage_norm":[20.0,80.0],"active_score":55.0,"correlation_coefficient":0.72,"low_norm":15.0,"norm_active_score":40.0,"high_norm":80.0}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"date":"2024-03-02","home_id":"home-a","water_consumption":[],"usage":[],"four_week_usage_norm":[],"active_score":5.0,"correlation_coefficient":0.1,"low_norm":15.0,"norm_active_score":40.0,"high_norm":80.0}}"#
        )
        .unwrap();

        let store = InMemoryMetricStore::from_ndjson_file(file.path()).await.unwrap();
        assert_eq!(store.len().await, 2);

        let found = store
            .find_one(date!(2024 - 03 - 01), "home-a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.water_consumption, vec![1.5, 2.0]);
        assert_eq!(found.correlation_coefficient, 0.72);
    }

    #[tokio::test]
    async fn rejects_malformed_seed_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"date":"2024-03-01","home_id":"home-a"}}"#).unwrap();

        let res = InMemoryMetricStore::from_ndjson_file(file.path()).await;
        assert!(matches!(res, Err(StoreError::Seed(msg)) if msg.starts_with("line 1")));
    }
}
