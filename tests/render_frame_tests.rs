use std::cell::Cell;

use chrono::{DateTime, TimeZone, Utc};
use focus_context::ChartError;
use focus_context::api::{FocusContextChart, FocusContextConfig};
use focus_context::core::{Dataset, LinearScale, Record, TimeWindow, Viewport};
use focus_context::render::{
    Axis, Color, LinePlotter, LinePrimitive, NullRenderer, Plot, PlotMargins, PlotSpec, Plotter,
    RenderFrame, Renderer,
};

fn utc(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn month_dataset() -> Dataset {
    Dataset::new(
        (1..=31)
            .map(|day| Record::new(utc(day)).with_channel("data", f64::from(day)))
            .collect(),
    )
}

#[test]
fn line_plotter_maps_extent_to_plot_area() {
    let dataset = month_dataset();
    let spec = PlotSpec::new(&dataset, "data", Viewport::new(500, 200));
    let plot = LinePlotter::default().plot(&spec).expect("plot");

    assert_eq!(plot.scale(Axis::X).range(), (40.0, 480.0));
    assert_eq!(plot.scale(Axis::Y).range(), (170.0, 20.0));
    assert_eq!(plot.x_window().expect("window"), TimeWindow::new(utc(1), utc(31)));
    assert_eq!(plot.frame().lines.len(), 30);
    assert_eq!(plot.frame().texts.len(), 1);
    assert_eq!(plot.frame().texts[0].text, "data");
}

#[test]
fn clipped_plot_keeps_lines_inside_area() {
    let dataset = month_dataset();
    let spec = PlotSpec {
        x_domain: Some(TimeWindow::new(utc(10), utc(12))),
        clip: true,
        label: false,
        ..PlotSpec::new(&dataset, "data", Viewport::new(500, 200))
    };
    let plot = LinePlotter::default().plot(&spec).expect("plot");

    assert!(!plot.frame().lines.is_empty());
    for line in &plot.frame().lines {
        assert!(line.x1 >= 40.0 - 1e-9 && line.x2 <= 480.0 + 1e-9);
    }
    assert!(plot.frame().texts.is_empty());
}

#[test]
fn reused_y_scale_keeps_domain() {
    let dataset = month_dataset();
    let y = LinearScale::new((-100.0, 100.0), (0.0, 1.0)).expect("scale");
    let spec = PlotSpec {
        y_scale: Some(y),
        ..PlotSpec::new(&dataset, "data", Viewport::new(500, 200))
    };
    let plot = LinePlotter::default().plot(&spec).expect("plot");
    assert_eq!(plot.scale(Axis::Y).domain(), (-100.0, 100.0));
    assert_eq!(plot.scale(Axis::Y).range(), (170.0, 20.0));
}

#[test]
fn margins_larger_than_viewport_are_rejected() {
    let dataset = month_dataset();
    let spec = PlotSpec {
        margins: PlotMargins {
            top: 0.0,
            right: 300.0,
            bottom: 0.0,
            left: 300.0,
        },
        ..PlotSpec::new(&dataset, "data", Viewport::new(500, 200))
    };
    let err = LinePlotter::default().plot(&spec).expect_err("too narrow");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
}

#[test]
fn tooltips_pick_nearest_sample_in_window() {
    let dataset = month_dataset();
    let spec = PlotSpec {
        x_domain: Some(TimeWindow::new(utc(1), utc(11))),
        tip: true,
        ..PlotSpec::new(&dataset, "data", Viewport::new(440, 200))
    };
    let plot = LinePlotter::default().plot(&spec).expect("plot");

    // 38px per day across (40, 420)
    let tip = plot.tooltip_at(40.0 + 38.0 * 4.0 + 10.0).expect("tooltip");
    assert_eq!(tip.timestamp, utc(5));
    assert_eq!(tip.value, 5.0);
    assert!(plot.tooltip_at(10.0).is_none());
}

#[test]
fn composed_frame_stacks_context_below_focus() {
    let config = FocusContextConfig::new(600, ["data"]).with_heights(300, 80);
    let chart = FocusContextChart::new(month_dataset(), config).expect("chart");

    let frame = chart.compose_frame();
    assert_eq!(frame.viewport, Viewport::new(600, 380));

    let focus = chart.focus().render();
    let context = chart.context().render();
    assert_eq!(frame.lines.len(), focus.lines.len() + context.lines.len());
    assert_eq!(frame.rects.len(), focus.rects.len() + context.rects.len());

    let brush = context.rects.last().expect("brush rect");
    let placed = frame.rects.last().expect("placed brush rect");
    assert_eq!(placed.y, brush.y + 300.0);
    assert_eq!(placed.x, brush.x);

    let mut renderer = NullRenderer::default();
    chart.render(&mut renderer).expect("render");
    assert_eq!(renderer.last_rect_count, frame.rects.len());
    assert_eq!(renderer.last_text_count, 1);
}

#[test]
fn focus_tooltips_follow_current_window() {
    let chart =
        FocusContextChart::new(month_dataset(), FocusContextConfig::new(600, ["data"])).expect("chart");

    let tip = chart.focus().tooltip_at(300.0).expect("tooltip");
    assert!(chart.focus().window().contains(tip.timestamp));
    assert!(chart.focus().tooltip_at(5.0).is_none());
}

#[test]
fn null_renderer_rejects_invalid_primitives() {
    let frame = RenderFrame::new(Viewport::new(100, 100)).with_line(LinePrimitive::new(
        0.0,
        0.0,
        f64::NAN,
        10.0,
        1.0,
        Color::rgb(0.0, 0.0, 0.0),
    ));
    let mut renderer = NullRenderer::default();
    assert!(renderer.render(&frame).is_err());
    assert_eq!(renderer.frames_rendered, 0);
}

#[derive(Default)]
struct CountingPlotter {
    inner: LinePlotter,
    calls: Cell<usize>,
    clipped_calls: Cell<usize>,
}

impl Plotter for CountingPlotter {
    fn plot(&self, spec: &PlotSpec<'_>) -> focus_context::ChartResult<Plot> {
        self.calls.set(self.calls.get() + 1);
        if spec.clip {
            self.clipped_calls.set(self.clipped_calls.get() + 1);
        }
        self.inner.plot(spec)
    }
}

#[test]
fn custom_plotter_draws_both_views() {
    let chart = FocusContextChart::with_plotter(
        month_dataset(),
        FocusContextConfig::new(600, ["data"]),
        CountingPlotter::default(),
    )
    .expect("chart");

    // focus initial + context overview + focus reset redraw
    assert_eq!(chart.focus().plotter().calls.get(), 3);
    assert_eq!(chart.focus().plotter().clipped_calls.get(), 2);

    chart.focus().wheel(300.0, -100.0).expect("wheel");
    assert_eq!(chart.focus().plotter().calls.get(), 4);
}
