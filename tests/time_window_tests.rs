use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use focus_context::ChartError;
use focus_context::core::TimeWindow;

fn day(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
}

#[test]
fn inverted_endpoints_are_swapped() {
    let window = TimeWindow::new(day(3, 1), day(1, 1));
    assert_eq!(window.start(), day(1, 1));
    assert_eq!(window.end(), day(3, 1));
}

#[test]
fn from_millis_accepts_any_order() {
    let window = TimeWindow::from_millis(2_000.0, 1_000.0).expect("window");
    assert_eq!(window.as_millis(), (1_000.0, 2_000.0));
    assert_eq!(window.span(), TimeDelta::seconds(1));
}

#[test]
fn from_millis_rejects_non_finite_values() {
    let err = TimeWindow::from_millis(f64::NAN, 0.0).expect_err("nan");
    assert!(matches!(err, ChartError::InvalidData(_)));
    let err = TimeWindow::from_millis(0.0, f64::INFINITY).expect_err("inf");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn degenerate_window_widens_symmetrically() {
    let at = day(6, 1);
    let window = TimeWindow::new(at, at);
    assert!(window.is_degenerate());

    let widened = window.normalized(TimeDelta::seconds(1)).expect("normalize");
    assert_eq!(widened.span(), TimeDelta::seconds(1));
    assert_eq!(widened.start(), at - TimeDelta::milliseconds(500));
    assert_eq!(widened.end(), at + TimeDelta::milliseconds(500));
}

#[test]
fn normalize_rejects_non_positive_minimum() {
    let window = TimeWindow::new(day(1, 1), day(1, 2));
    let err = window.normalized(TimeDelta::zero()).expect_err("zero minimum");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn clamp_to_collapses_wide_window_to_extent() {
    let extent = TimeWindow::new(day(2, 1), day(3, 1));
    let window = TimeWindow::new(day(1, 1), day(4, 1));
    assert_eq!(window.clamp_to(extent).expect("clamp"), extent);
}

#[test]
fn clamp_to_shifts_early_window_right() {
    let extent = TimeWindow::new(day(2, 1), day(5, 1));
    let window = TimeWindow::new(day(1, 20), day(2, 10));

    let clamped = window.clamp_to(extent).expect("clamp");
    assert_eq!(clamped.start(), extent.start());
    assert_eq!(clamped.span(), window.span());
}

#[test]
fn clamp_to_keeps_inner_window() {
    let extent = TimeWindow::new(day(1, 1), day(12, 1));
    let window = TimeWindow::new(day(3, 1), day(4, 1));
    assert_eq!(window.clamp_to(extent).expect("clamp"), window);
}

#[test]
fn contains_and_intersects_are_inclusive() {
    let window = TimeWindow::new(day(1, 1), day(1, 31));
    assert!(window.contains(day(1, 1)));
    assert!(window.contains(day(1, 31)));
    assert!(!window.contains(day(2, 1)));

    let touching = TimeWindow::new(day(1, 31), day(2, 10));
    assert!(window.intersects(touching));
    let disjoint = TimeWindow::new(day(2, 1), day(2, 10));
    assert!(!window.intersects(disjoint));
}

#[test]
fn window_serializes_as_rfc3339_endpoints() {
    let window = TimeWindow::new(day(1, 1), day(1, 2));
    let json = serde_json::to_string(&window).expect("serialize");
    assert_eq!(
        json,
        r#"{"start":"2024-01-01T00:00:00Z","end":"2024-01-02T00:00:00Z"}"#
    );
}
