pub mod daily_metrics_queries;

pub use daily_metrics_queries::{distinct_home_ids, fetch_daily_metrics};
