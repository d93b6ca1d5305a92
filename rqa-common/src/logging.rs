//! Tracing subscriber setup shared by all service binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the env filter: `RUST_LOG` wins, otherwise `level` for this crate
/// family and `tower_http`
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},rqa_common={level},rqa_ks={level},rqa_ms={level},rqa_va={level},tower_http={level}"
        ))
    })
}

/// Install the global tracing subscriber (console output)
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(level: &str) -> crate::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|e| crate::Error::Internal(format!("tracing init failed: {}", e)))
}
