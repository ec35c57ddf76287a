use tracing_subscriber::{EnvFilter, fmt};

pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    // Single-line output; request traces come from tower-http's TraceLayer.
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
