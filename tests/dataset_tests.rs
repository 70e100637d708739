use chrono::{TimeZone, Utc};
use focus_context::ChartError;
use focus_context::core::{Dataset, Record, TimeWindow};

#[test]
fn parses_json_records_with_named_channels() {
    let json = r#"[
        {"timestamp": "2024-01-01T00:00:00Z", "data": 0.25, "volume": 10},
        {"timestamp": "2024-01-02T00:00:00Z", "data": 0.5, "volume": 12}
    ]"#;
    let dataset = Dataset::from_json_str(json).expect("dataset");

    assert_eq!(dataset.len(), 2);
    let first = &dataset.records()[0];
    assert_eq!(first.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(first.channel("data"), Some(0.25));
    assert_eq!(first.channel("volume"), Some(10.0));
    assert_eq!(
        first.channels.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["data", "volume"]
    );
}

#[test]
fn malformed_json_is_invalid_data() {
    let err = Dataset::from_json_str(r#"[{"data": 1.0}]"#).expect_err("missing timestamp");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn empty_dataset_has_no_extent() {
    let dataset = Dataset::new(Vec::new());
    assert!(dataset.is_empty());
    assert!(matches!(dataset.extent(), Err(ChartError::EmptyDataset)));
    assert!(matches!(
        dataset.ensure_channel("data"),
        Err(ChartError::EmptyDataset)
    ));
}

#[test]
fn single_record_extent_is_degenerate() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let dataset = Dataset::new(vec![Record::new(at).with_channel("data", 1.0)]);
    let extent = dataset.extent().expect("extent");
    assert_eq!(extent, TimeWindow::new(at, at));
    assert!(extent.is_degenerate());
}

#[test]
fn unknown_channel_is_reported_by_name() {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let dataset = Dataset::new(vec![Record::new(at).with_channel("data", 1.0)]);
    match dataset.ensure_channel("price") {
        Err(ChartError::UnknownChannel(name)) => assert_eq!(name, "price"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn points_skip_missing_and_non_finite_values() {
    let at = |day| Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
    let dataset = Dataset::new(vec![
        Record::new(at(1)).with_channel("data", 1.0),
        Record::new(at(2)).with_channel("other", 2.0),
        Record::new(at(3)).with_channel("data", f64::NAN),
        Record::new(at(4)).with_channel("data", 4.0),
    ]);

    let points = dataset.points("data").expect("points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].x, at(1).timestamp_millis() as f64);
    assert_eq!(points[1].y, 4.0);
    assert_eq!(dataset.channel_extent("data").expect("extent"), (1.0, 4.0));
}

#[test]
fn records_in_window_is_inclusive() {
    let at = |day| Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap();
    let dataset: Dataset = (1..=10)
        .map(|day| Record::new(at(day)).with_channel("data", f64::from(day)))
        .collect::<Vec<_>>()
        .into();

    let inside = dataset.records_in_window(TimeWindow::new(at(3), at(5)));
    assert_eq!(inside.len(), 3);
    assert_eq!(inside[0].timestamp, at(3));
}
