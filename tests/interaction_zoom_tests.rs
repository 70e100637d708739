use approx::assert_relative_eq;
use focus_context::core::LinearScale;
use focus_context::interaction::{
    GesturePhase, InteractionMode, SourceEvent, ZoomBehavior, ZoomConfig, ZoomTransform,
};

fn behavior() -> ZoomBehavior {
    ZoomBehavior::new(ZoomConfig::clamped_to_range((0.0, 1000.0))).expect("zoom")
}

#[test]
fn wheel_opens_gesture_and_zooms_around_anchor() {
    let mut zoom = behavior();
    let events = zoom.wheel(250.0, -500.0).expect("wheel");

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].phase, GesturePhase::Start);
    assert_eq!(events[1].phase, GesturePhase::Active);
    assert!(events.iter().all(|event| event.is_user_input()));
    assert_eq!(zoom.mode(), InteractionMode::Zooming);

    let transform = zoom.transform();
    assert_relative_eq!(transform.k, 2.0);
    assert_relative_eq!(transform.apply_x(250.0), 250.0);
}

#[test]
fn repeated_wheel_stays_in_one_gesture() {
    let mut zoom = behavior();
    zoom.wheel(500.0, -100.0).expect("wheel");
    let events = zoom.wheel(500.0, -100.0).expect("wheel");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].phase, GesturePhase::Active);

    let end = zoom.end_gesture(500.0);
    assert_eq!(end.len(), 1);
    assert_eq!(end[0].phase, GesturePhase::End);
    assert_eq!(zoom.mode(), InteractionMode::Idle);
    assert!(zoom.end_gesture(500.0).is_empty());
}

#[test]
fn wheel_out_never_goes_below_identity() {
    let mut zoom = behavior();
    zoom.wheel(100.0, 2_000.0).expect("wheel");
    assert_eq!(zoom.transform(), ZoomTransform::IDENTITY);
}

#[test]
fn drag_pans_and_is_constrained() {
    let mut zoom = behavior();
    zoom.wheel(500.0, -500.0).expect("wheel");
    zoom.end_gesture(500.0);

    let start = zoom.drag_start(500.0).expect("drag start");
    assert_eq!(start[0].phase, GesturePhase::Start);
    assert!(matches!(
        start[0].source,
        Some(SourceEvent::PointerDown { x }) if x == 500.0
    ));
    assert_eq!(zoom.mode(), InteractionMode::Panning);

    zoom.drag_to(600.0).expect("drag");
    assert_relative_eq!(zoom.transform().invert_x(600.0), 500.0);

    zoom.drag_to(10_000.0).expect("drag far right");
    assert_relative_eq!(zoom.transform().invert_x(0.0), 0.0);
}

#[test]
fn drag_to_without_drag_is_ignored() {
    let mut zoom = behavior();
    assert!(zoom.drag_to(10.0).expect("drag").is_empty());
}

#[test]
fn programmatic_transform_has_no_source() {
    let mut zoom = behavior();
    let events = zoom
        .set_transform(ZoomTransform { k: 4.0, x: -1000.0 })
        .expect("set transform");

    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|event| !event.is_user_input()));
    assert_eq!(events[2].phase, GesturePhase::End);
    assert_eq!(zoom.transform(), ZoomTransform { k: 4.0, x: -1000.0 });
}

#[test]
fn set_transform_rejects_invalid_scale() {
    let mut zoom = behavior();
    assert!(zoom.set_transform(ZoomTransform { k: 0.0, x: 0.0 }).is_err());
    assert!(
        zoom.set_transform(ZoomTransform { k: f64::NAN, x: 0.0 })
            .is_err()
    );
}

#[test]
fn rescale_narrows_reference_domain() {
    let reference = LinearScale::new((0.0, 100.0), (0.0, 1000.0)).expect("scale");
    let transform = ZoomTransform::IDENTITY.scale(2.0).translate(-250.0);

    let rescaled = transform.rescale(reference).expect("rescale");
    let (d0, d1) = rescaled.domain();
    assert_relative_eq!(d0, 25.0);
    assert_relative_eq!(d1, 75.0);
    assert_eq!(rescaled.range(), reference.range());
}

#[test]
fn invalid_config_is_rejected() {
    let config = ZoomConfig {
        scale_extent: (0.0, 10.0),
        extent: (0.0, 100.0),
        translate_extent: (0.0, 100.0),
    };
    assert!(ZoomBehavior::new(config).is_err());
}
