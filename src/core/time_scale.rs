use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::{LinearScale, TimeWindow};
use crate::error::ChartResult;

/// Time axis mapping between UTC instants and pixel x coordinates.
///
/// Thin typed wrapper over a `LinearScale` whose domain is unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    linear: LinearScale,
}

impl TimeScale {
    /// Fails for zero-width windows; normalize the window first.
    pub fn new(window: TimeWindow, range: (f64, f64)) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::new(window.as_millis(), range)?,
        })
    }

    #[must_use]
    pub fn from_linear(linear: LinearScale) -> Self {
        Self { linear }
    }

    #[must_use]
    pub fn linear(self) -> LinearScale {
        self.linear
    }

    pub fn window(self) -> ChartResult<TimeWindow> {
        let (start, end) = self.linear.domain();
        TimeWindow::from_millis(start, end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn apply(self, time: DateTime<Utc>) -> f64 {
        self.linear.apply(datetime_to_unix_millis(time))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        unix_millis_to_datetime(self.linear.invert(pixel))
    }

    /// Pixel span covered by `window`, ordered left to right.
    #[must_use]
    pub fn window_to_pixels(self, window: TimeWindow) -> (f64, f64) {
        let a = self.apply(window.start());
        let b = self.apply(window.end());
        if a <= b { (a, b) } else { (b, a) }
    }

    pub fn pixels_to_window(self, selection: (f64, f64)) -> ChartResult<TimeWindow> {
        Ok(TimeWindow::new(
            self.invert(selection.0)?,
            self.invert(selection.1)?,
        ))
    }
}
