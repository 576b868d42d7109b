use crate::core::config::LoggingConfig;
use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter from `RUST_LOG`, falling back to the configured level.
/// HTTP client internals are capped at warn so provider calls stay readable.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},hyper_util=warn,reqwest=warn", config.level))
    })
}

pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let use_console = config.console || config.format == "console";

    let registry = tracing_subscriber::registry().with(env_filter(config));

    let result = if use_console {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
    };

    result.map_err(|e| anyhow!("Failed to initialize tracing: {}", e))
}
