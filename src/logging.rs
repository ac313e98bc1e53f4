// src/logging.rs

use tracing_subscriber::{fmt, EnvFilter};

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}

/// Install the fmt subscriber. `RUST_LOG` wins, then `LOG_LEVEL`, then `info`.
pub fn init() {
    fmt::Subscriber::builder()
        .with_env_filter(filter())
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
}

/// Route logs through the test harness; safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test() {
    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter())
        .with_test_writer()
        .try_init();
}
