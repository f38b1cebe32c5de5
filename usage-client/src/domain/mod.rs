pub mod daily_metrics;
pub mod level;

pub use daily_metrics::DailyMetricRecord;
pub use level::{ColorTag, Level};
