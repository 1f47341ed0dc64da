//! Log subscriber for the plugin process.
//!
//! Terraform captures plugin stderr, so events go there as JSON lines.

use tracing_subscriber::EnvFilter;

/// Provider-specific log filter, checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TF_LOG_PROVIDER_PASSWORDSTATE";

/// Filter used when neither variable is set.
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive from the provider variable, then `RUST_LOG`.
pub fn filter_directive(provider: Option<String>, rust_log: Option<String>) -> String {
    provider
        .filter(|s| !s.trim().is_empty())
        .or_else(|| rust_log.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Parse `directive`, falling back to [`DEFAULT_FILTER`].
///
/// The parse error is handed back so it can be logged once the subscriber is up.
pub fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (EnvFilter::new(DEFAULT_FILTER), Some(err.to_string())),
    }
}

/// Install the global JSON subscriber.
pub fn init() -> anyhow::Result<()> {
    let directive = filter_directive(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok());
    let (filter, rejected) = build_filter(&directive);

    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    if let Some(error) = rejected {
        tracing::warn!(
            directive = %directive,
            error = %error,
            fallback = DEFAULT_FILTER,
            "invalid log filter, using the default"
        );
    }
    Ok(())
}
