use chrono::TimeDelta;
use tracing::trace;

use crate::core::{
    DataPoint, LinearScale, TimeScale, Viewport, points_in_time_window, project_line_segments,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, Plot, PlotSpec, Plotter, RectPrimitive, RenderFrame, TextHAlign,
    TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePlotStyle {
    pub line_color: Color,
    pub stroke_width: f64,
    pub frame_color: Color,
    pub label_color: Color,
    pub label_font_size_px: f64,
    /// Fraction of the y span added above and below when autoscaling.
    pub y_padding_ratio: f64,
}

impl Default for LinePlotStyle {
    fn default() -> Self {
        Self {
            line_color: Color::rgb(0.27, 0.51, 0.71),
            stroke_width: 1.5,
            frame_color: Color::rgba(0.0, 0.0, 0.0, 0.15),
            label_color: Color::rgb(0.2, 0.2, 0.2),
            label_font_size_px: 10.0,
            y_padding_ratio: 0.05,
        }
    }
}

/// Built-in single-channel line plotter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinePlotter {
    pub style: LinePlotStyle,
}

impl LinePlotter {
    #[must_use]
    pub fn new(style: LinePlotStyle) -> Self {
        Self { style }
    }

    fn y_scale(&self, spec: &PlotSpec<'_>, range: (f64, f64)) -> ChartResult<LinearScale> {
        if let Some(reused) = spec.y_scale {
            return LinearScale::new(reused.domain(), range);
        }

        let (min, max) = spec.dataset.channel_extent(spec.y_channel)?;
        let span = max - min;
        let padding = if span == 0.0 {
            min.abs().max(1.0) * 0.5
        } else {
            span * self.style.y_padding_ratio
        };
        LinearScale::new((min - padding, max + padding), range)
    }
}

impl Plotter for LinePlotter {
    fn plot(&self, spec: &PlotSpec<'_>) -> ChartResult<Plot> {
        let Viewport { width, height } = spec.viewport;
        let margins = spec.margins;
        if !spec.viewport.is_valid()
            || margins.left + margins.right >= f64::from(width)
            || margins.top + margins.bottom >= f64::from(height)
        {
            return Err(ChartError::InvalidViewport { width, height });
        }

        let x_range = (margins.left, f64::from(width) - margins.right);
        let y_range = (f64::from(height) - margins.bottom, margins.top);

        let x_window = match spec.x_domain {
            Some(window) => window,
            None => spec.dataset.extent()?,
        }
        .normalized(TimeDelta::milliseconds(1))?;
        let x_scale = TimeScale::new(x_window, x_range)?;
        let y_scale = self.y_scale(spec, y_range)?;

        let points = spec.dataset.points(spec.y_channel)?;
        let (start, end) = x_window.as_millis();
        let (drawn, clip_x) = if spec.clip {
            (points_in_time_window(&points, start, end), Some(x_range))
        } else {
            (points, None)
        };
        let segments = project_line_segments(&drawn, x_scale.linear(), y_scale, clip_x)?;
        trace!(segments = segments.len(), clip = spec.clip, "line plot");

        let mut frame = RenderFrame::new(spec.viewport).with_rect(
            RectPrimitive::new(
                x_range.0,
                y_range.1,
                x_range.1 - x_range.0,
                y_range.0 - y_range.1,
                Color::rgba(1.0, 1.0, 1.0, 0.0),
            )
            .with_border(1.0, self.style.frame_color),
        );
        frame.lines.extend(segments.into_iter().map(|segment| {
            LinePrimitive::new(
                segment.x1,
                segment.y1,
                segment.x2,
                segment.y2,
                self.style.stroke_width,
                self.style.line_color,
            )
        }));
        if spec.label && !spec.y_channel.is_empty() {
            frame.texts.push(TextPrimitive::new(
                spec.y_channel,
                margins.left,
                (margins.top - self.style.label_font_size_px - 4.0).max(0.0),
                self.style.label_font_size_px,
                self.style.label_color,
                TextHAlign::Left,
            ));
        }

        let plot = Plot::new(frame, x_scale, y_scale);
        if spec.tip {
            let samples = drawn_samples(&drawn, start, end);
            return Ok(plot.with_samples(samples));
        }
        Ok(plot)
    }
}

fn drawn_samples(points: &[DataPoint], start: f64, end: f64) -> Vec<DataPoint> {
    points
        .iter()
        .copied()
        .filter(|point| point.x >= start && point.x <= end)
        .collect()
}
