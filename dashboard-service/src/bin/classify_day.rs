use anyhow::{bail, Result};
use dashboard_service::{config::AppConfig, observability, store, DataAccessor};
use std::env;
use time::{macros::format_description, Date};
use usage_client::classify;

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing(observability::CLI_DIRECTIVE);

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        bail!("usage: classify_day <YYYY-MM-DD> <home_id>");
    }
    let date = Date::parse(&args[1], format_description!("[year]-[month]-[day]"))
        .map_err(|e| anyhow::anyhow!("invalid date '{}': {e}", args[1]))?;
    let home_id = &args[2];

    let cfg = AppConfig::load()?;
    let metric_store = store::open(&cfg.store).await?;
    let accessor = DataAccessor::new(metric_store.clone());

    let lookup = accessor.fetch(date, home_id).await;
    metric_store.close().await;

    let record = match lookup {
        Ok(record) => record,
        Err(not_found) => bail!("{not_found}"),
    };
    let c = classify::classify(&record)?;

    println!("home {home_id} on {date}");
    println!(
        "  activity:   {:<18} score {} (norms {} / {} / {})",
        c.activity.level().to_string(),
        record.active_score,
        record.low_norm,
        record.norm_active_score,
        record.high_norm
    );
    println!(
        "  regularity: {:<18} correlation {}",
        c.regularity.level().to_string(),
        record.correlation_coefficient
    );
    println!("  status:     {}", c.status.level());

    Ok(())
}
