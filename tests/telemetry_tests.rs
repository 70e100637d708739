use focus_context::telemetry::{DEFAULT_FILTER, init_default_tracing};

#[test]
fn default_filter_targets_this_crate() {
    assert!(DEFAULT_FILTER.starts_with("focus_context"));
}

#[cfg(not(feature = "telemetry"))]
#[test]
fn tracing_init_is_noop_without_feature() {
    assert!(!init_default_tracing());
}

#[cfg(feature = "telemetry")]
#[test]
fn tracing_init_succeeds_once() {
    let first = init_default_tracing();
    assert!(first);
    assert!(!init_default_tracing());
}
