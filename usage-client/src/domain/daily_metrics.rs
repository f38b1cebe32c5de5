use time::Date;

/// One household's metrics for one day, keyed by `(date, home_id)`.
///
/// Rows are written by the upstream ingestion process; this crate only reads
/// them. `low_norm <= norm_active_score <= high_norm` is expected but not
/// checked.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyMetricRecord {
    pub date: Date,
    pub home_id: String,
    pub water_consumption: Vec<f64>,
    pub usage: Vec<f64>,
    pub four_week_usage_norm: Vec<f64>,
    pub active_score: f64,
    pub correlation_coefficient: f64,
    pub low_norm: f64,
    pub norm_active_score: f64,
    pub high_norm: f64,
}
