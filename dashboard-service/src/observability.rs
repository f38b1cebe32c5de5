use tracing_subscriber::EnvFilter;

/// Default for the long-running server.
pub const SERVER_DIRECTIVE: &str = "dashboard_service=info";
/// One-shot binaries keep stdout for their own output.
pub const CLI_DIRECTIVE: &str = "dashboard_service=warn";

/// `RUST_LOG` when set and parseable, otherwise `directive`.
fn build_filter(env_value: Option<&str>, directive: &str) -> EnvFilter {
    env_value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(directive))
}

pub fn init_tracing(directive: &str) {
    let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(env_value.as_deref(), directive);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
