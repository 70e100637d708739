use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::unix_millis_to_datetime;
use crate::core::{DataPoint, Dataset, LinearScale, TimeScale, TimeWindow, Viewport};
use crate::error::ChartResult;
use crate::render::RenderFrame;

/// Rendering adapter: turns a plot description into a drawable.
///
/// Implementations never mutate a previous plot; each call returns a fresh
/// `Plot` with its own scales.
pub trait Plotter {
    fn plot(&self, spec: &PlotSpec<'_>) -> ChartResult<Plot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Space reserved around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 30.0,
            left: 40.0,
        }
    }
}

/// Everything a `Plotter` needs for one render.
#[derive(Debug, Clone, Copy)]
pub struct PlotSpec<'a> {
    pub dataset: &'a Dataset,
    pub y_channel: &'a str,
    pub viewport: Viewport,
    pub margins: PlotMargins,
    /// Visible x domain; the full data extent when `None`.
    pub x_domain: Option<TimeWindow>,
    /// Reuse the domain of a previously computed y scale.
    pub y_scale: Option<LinearScale>,
    /// Cut marks at the plotting area edges.
    pub clip: bool,
    /// Keep samples for `Plot::tooltip_at`.
    pub tip: bool,
    /// Draw the y-channel name above the plotting area.
    pub label: bool,
}

impl<'a> PlotSpec<'a> {
    #[must_use]
    pub fn new(dataset: &'a Dataset, y_channel: &'a str, viewport: Viewport) -> Self {
        Self {
            dataset,
            y_channel,
            viewport,
            margins: PlotMargins::default(),
            x_domain: None,
            y_scale: None,
            clip: false,
            tip: false,
            label: true,
        }
    }
}

/// Nearest sample under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

/// Drawable produced by a `Plotter`: primitives plus the scales that placed
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    frame: RenderFrame,
    x: TimeScale,
    y: LinearScale,
    samples: Vec<DataPoint>,
}

impl Plot {
    #[must_use]
    pub fn new(frame: RenderFrame, x: TimeScale, y: LinearScale) -> Self {
        Self {
            frame,
            x,
            y,
            samples: Vec::new(),
        }
    }

    /// Enables tooltips over the given samples (x in unix millis).
    #[must_use]
    pub fn with_samples(mut self, samples: Vec<DataPoint>) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn frame(&self) -> &RenderFrame {
        &self.frame
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.frame.viewport
    }

    #[must_use]
    pub fn scale(&self, axis: Axis) -> LinearScale {
        match axis {
            Axis::X => self.x.linear(),
            Axis::Y => self.y,
        }
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        self.x
    }

    pub fn x_window(&self) -> ChartResult<TimeWindow> {
        self.x.window()
    }

    /// Sample closest to `pointer_x` horizontally, when tooltips are enabled
    /// and the pointer is over the plotting area.
    #[must_use]
    pub fn tooltip_at(&self, pointer_x: f64) -> Option<Tooltip> {
        if !self.x.linear().range_contains(pointer_x) {
            return None;
        }
        let best = self
            .samples
            .iter()
            .min_by_key(|sample| OrderedFloat((self.x.linear().apply(sample.x) - pointer_x).abs()))?;
        Some(Tooltip {
            timestamp: unix_millis_to_datetime(best.x).ok()?,
            value: best.y,
            x: self.x.linear().apply(best.x),
            y: self.y.apply(best.y),
        })
    }
}
