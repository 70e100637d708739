use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::error::{ChartError, ChartResult};

/// Visible time range shared by the focus and context views.
///
/// Always ordered: `start <= end`. Windows are replaced, never edited in
/// place; every adjusting method returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Builds a window from two endpoints in any order.
    #[must_use]
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Builds a window from unix-millisecond endpoints in any order.
    pub fn from_millis(a: f64, b: f64) -> ChartResult<Self> {
        Ok(Self::new(
            unix_millis_to_datetime(a)?,
            unix_millis_to_datetime(b)?,
        ))
    }

    #[must_use]
    pub fn start(self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub fn end(self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn span(self) -> TimeDelta {
        self.end - self.start
    }

    #[must_use]
    pub fn as_millis(self) -> (f64, f64) {
        (
            datetime_to_unix_millis(self.start),
            datetime_to_unix_millis(self.end),
        )
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn contains(self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.end
    }

    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Widens the window symmetrically around its midpoint until it spans at
    /// least `min_span`. Windows already wide enough are returned unchanged.
    pub fn normalized(self, min_span: TimeDelta) -> ChartResult<Self> {
        if min_span <= TimeDelta::zero() {
            return Err(ChartError::InvalidData(
                "minimum window span must be > 0".to_owned(),
            ));
        }
        if self.span() >= min_span {
            return Ok(self);
        }

        let missing = min_span - self.span();
        let left = missing / 2;
        let right = missing - left;
        let start = self
            .start
            .checked_sub_signed(left)
            .ok_or_else(|| overflow_error("widen"))?;
        let end = self
            .end
            .checked_add_signed(right)
            .ok_or_else(|| overflow_error("widen"))?;
        Ok(Self { start, end })
    }

    /// Moves the window inside `extent`, keeping its span when it fits.
    ///
    /// A window at least as wide as `extent` collapses to `extent`.
    pub fn clamp_to(self, extent: Self) -> ChartResult<Self> {
        if self.span() >= extent.span() {
            return Ok(extent);
        }

        if self.start < extent.start {
            let end = extent
                .start
                .checked_add_signed(self.span())
                .ok_or_else(|| overflow_error("clamp"))?;
            return Ok(Self {
                start: extent.start,
                end,
            });
        }
        if self.end > extent.end {
            let start = extent
                .end
                .checked_sub_signed(self.span())
                .ok_or_else(|| overflow_error("clamp"))?;
            return Ok(Self {
                start,
                end: extent.end,
            });
        }

        Ok(self)
    }
}

fn overflow_error(operation: &str) -> ChartError {
    ChartError::InvalidData(format!(
        "time window {operation} overflows the representable time range"
    ))
}
