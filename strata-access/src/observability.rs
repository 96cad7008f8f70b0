//! Tracing initialization
//!
//! Every engine operation emits structured attempt/success/failure events;
//! this module wires a JSON subscriber so embedding applications get them
//! with one call.

use tracing_subscriber::EnvFilter;

use crate::config::AccessConfig;

/// Initialize JSON-formatted tracing from configuration
///
/// Safe to call more than once; later calls are no-ops (useful in tests).
pub fn init_tracing(config: &AccessConfig) {
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().json().with_env_filter(filter).try_init();

    tracing::info!(log_level = %config.log_level, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_is_idempotent() {
        let config = AccessConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn test_init_tracing_with_bad_level_falls_back() {
        let mut config = AccessConfig::default();
        config.log_level = "definitely-not-a-level!!!".to_string();
        init_tracing(&config);
    }
}
