//! Telemetry helpers for hosts embedding `lexis-views`.
//!
//! Nothing here runs implicitly. Hosts either call one of the init helpers
//! below or install their own `tracing` subscriber; the coordination engine
//! only emits events through `tracing` macros.

/// Filter directive used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER_DIRECTIVE: &str = "info";

/// Installs a compact stderr subscriber filtered by `RUST_LOG`, falling back
/// to [`DEFAULT_FILTER_DIRECTIVE`].
///
/// Returns `false` when the `telemetry` feature is disabled or the host
/// already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_fallback(DEFAULT_FILTER_DIRECTIVE)
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback directive,
/// e.g. `"lexis_views=debug"` for replay tooling.
#[must_use]
pub fn init_tracing_with_fallback(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
