//! Tracing setup for hosts embedding `focus-context-rs`.
//!
//! Window publications, brush moves and focus redraws are emitted as
//! `tracing` events under the `focus_context` target. Hosts may call
//! `init_default_tracing` or install their own subscriber.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "focus_context=info";

/// Installs a compact `fmt` subscriber when the `telemetry` feature is on.
///
/// Returns `false` when the feature is off or a global subscriber already
/// exists.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
