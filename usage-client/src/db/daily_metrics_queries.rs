use anyhow::Result;
use sqlx::PgPool;
use time::Date;

use crate::domain::DailyMetricRecord;

/// Point lookup of a single household-day.
pub async fn fetch_daily_metrics(
    pool: &PgPool,
    date: Date,
    home_id: &str,
) -> Result<Option<DailyMetricRecord>> {
    let row = sqlx::query_as::<_, DailyMetricRecord>(
        r#"
        SELECT
            date,
            home_id,
            water_consumption,
            usage,
            four_week_usage_norm,
            active_score,
            correlation_coefficient,
            low_norm,
            norm_active_score,
            high_norm
        FROM daily_metrics
        WHERE date = $1
          AND home_id = $2
        LIMIT 1
        "#,
    )
    .bind(date)
    .bind(home_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Every household that has at least one day of metrics, in stable order.
pub async fn distinct_home_ids(pool: &PgPool) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT DISTINCT home_id
        FROM daily_metrics
        ORDER BY home_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
