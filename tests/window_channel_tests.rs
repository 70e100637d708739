use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use focus_context::ChartError;
use focus_context::api::{Origin, WindowChange, WindowChannel};
use focus_context::core::TimeWindow;

fn window(day: u32) -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 1, day + 1, 0, 0, 0).unwrap(),
    )
}

#[test]
fn publish_without_subscribers_stores_window() {
    let channel = WindowChannel::new();
    let delivered = channel
        .publish(Origin::Reset, Some(window(1)))
        .expect("publish");

    assert_eq!(delivered, 0);
    assert_eq!(channel.current(), Some(window(1)));
    assert_eq!(channel.revision(), 1);
}

#[test]
fn handlers_run_in_subscription_order() {
    let channel = WindowChannel::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let log = Rc::clone(&log);
        channel
            .subscribe(name, move |_| log.borrow_mut().push(name))
            .expect("subscribe");
    }
    channel.publish(Origin::Reset, None).expect("publish");

    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn same_qualifier_replaces_handler_in_place() {
    let channel = WindowChannel::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    for (name, tag) in [("a", "a1"), ("b", "b1"), ("a", "a2")] {
        let log = Rc::clone(&log);
        channel
            .subscribe(name, move |_| log.borrow_mut().push(tag))
            .expect("subscribe");
    }
    assert_eq!(channel.subscriber_count(), 2);

    channel.publish(Origin::Reset, None).expect("publish");
    assert_eq!(*log.borrow(), vec!["a2", "b1"]);
}

#[test]
fn unsubscribe_removes_only_named_handler() {
    let channel = WindowChannel::new();
    channel.subscribe("focus.0", |_| {}).expect("subscribe");
    channel.subscribe("context.1", |_| {}).expect("subscribe");

    assert!(channel.unsubscribe("focus.0").expect("unsubscribe"));
    assert!(!channel.unsubscribe("focus.0").expect("unsubscribe"));
    assert!(!channel.has_subscriber("focus.0"));
    assert!(channel.has_subscriber("context.1"));
}

#[test]
fn handlers_receive_origin_and_window() {
    let channel = WindowChannel::new();
    let id = channel.register();
    let received: Rc<RefCell<Option<WindowChange>>> = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&received);
    channel
        .subscribe("probe", move |change| *sink.borrow_mut() = Some(*change))
        .expect("subscribe");
    channel
        .publish(Origin::Controller(id), Some(window(3)))
        .expect("publish");

    let change = received.borrow().expect("delivered");
    assert!(change.is_from(id));
    assert_eq!(change.window, Some(window(3)));
}

#[test]
fn reset_origin_is_never_a_controller() {
    let channel = WindowChannel::new();
    let a = channel.register();
    let b = channel.register();
    assert_ne!(a, b);

    let change = WindowChange {
        origin: Origin::Reset,
        window: None,
    };
    assert!(!change.is_from(a));
    assert!(!change.is_from(b));
}

#[test]
fn publishing_from_a_handler_is_rejected() {
    let channel = Rc::new(WindowChannel::new());
    let nested: Rc<RefCell<Option<Result<usize, ChartError>>>> = Rc::new(RefCell::new(None));

    let inner_channel = Rc::downgrade(&channel);
    let sink = Rc::clone(&nested);
    channel
        .subscribe("echo", move |change| {
            if let Some(channel) = inner_channel.upgrade() {
                *sink.borrow_mut() = Some(channel.publish(Origin::Reset, change.window));
            }
        })
        .expect("subscribe");

    channel
        .publish(Origin::Reset, Some(window(5)))
        .expect("outer publish");

    let result = nested.borrow_mut().take().expect("handler ran");
    assert!(matches!(result, Err(ChartError::ReentrantPublish)));
    assert_eq!(channel.revision(), 1);
    assert_eq!(channel.current(), Some(window(5)));
}
