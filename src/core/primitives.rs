use chrono::{DateTime, Utc};

use crate::error::{ChartError, ChartResult};

/// Scales operate on unix milliseconds so pixel math stays in `f64`.
#[must_use]
pub fn datetime_to_unix_millis(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64
}

/// Rounds to the nearest millisecond; out-of-range values are rejected.
pub fn unix_millis_to_datetime(millis: f64) -> ChartResult<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(ChartError::InvalidData(
            "time value must be finite".to_owned(),
        ));
    }

    let rounded = millis.round();
    if rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(ChartError::InvalidData(format!(
            "time value {millis} is outside the representable range"
        )));
    }

    DateTime::from_timestamp_millis(rounded as i64).ok_or_else(|| {
        ChartError::InvalidData(format!(
            "time value {millis} is outside the representable range"
        ))
    })
}
