#![forbid(unsafe_code)]

//! Logging setup.
//!
//! Every crate logs through `tracing`. With the `tracing-json` feature this
//! module can install a JSON subscriber filtered by the `FOLIO_LOG`
//! environment variable (falling back to `info`).

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Install a global JSON subscriber.
///
/// Returns `false` when a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .is_ok()
}

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    // The only test in this binary that installs a global subscriber.
    #[test]
    fn installs_once_per_process() {
        assert!(init_json_logging());
        assert!(!init_json_logging());
        tracing::info!(target: "folio_core::logging", "json logging active");
    }
}
