use std::rc::Rc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::datetime_to_unix_millis;
use crate::core::{DataPoint, TimeWindow};
use crate::error::{ChartError, ChartResult};

/// One timestamped sample with one or more named numeric channels.
///
/// JSON form: `{"timestamp": "2024-01-01T00:00:00+00:00", "data": 0.25}`.
/// Every field other than `timestamp` becomes a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub channels: IndexMap<String, f64>,
}

impl Record {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            channels: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_channel(mut self, name: impl Into<String>, value: f64) -> Self {
        self.channels.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn channel(&self, name: &str) -> Option<f64> {
        self.channels.get(name).copied()
    }
}

/// Immutable, cheaply cloneable record sequence shared by both views.
///
/// Records are expected in ascending timestamp order. Extent queries do not
/// rely on that order.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Rc<[Record]>,
}

impl Dataset {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Parses a JSON array of records.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let records: Vec<Record> = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse dataset json: {e}")))?;
        debug!(count = records.len(), "parsed dataset");
        Ok(Self::new(records))
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest timestamps present.
    pub fn extent(&self) -> ChartResult<TimeWindow> {
        let mut iter = self.records.iter().map(|record| record.timestamp);
        let first = iter.next().ok_or(ChartError::EmptyDataset)?;
        let (min, max) = iter.fold((first, first), |(min, max), time| {
            (min.min(time), max.max(time))
        });
        Ok(TimeWindow::new(min, max))
    }

    /// Fails when no record carries `name`.
    pub fn ensure_channel(&self, name: &str) -> ChartResult<()> {
        if self.is_empty() {
            return Err(ChartError::EmptyDataset);
        }
        if self.records.iter().any(|record| record.channels.contains_key(name)) {
            Ok(())
        } else {
            Err(ChartError::UnknownChannel(name.to_owned()))
        }
    }

    /// Projects one channel into `(unix millis, value)` points.
    ///
    /// Records missing the channel or holding a non-finite value are skipped.
    pub fn points(&self, channel: &str) -> ChartResult<Vec<DataPoint>> {
        self.ensure_channel(channel)?;
        Ok(self
            .records
            .iter()
            .filter_map(|record| {
                let y = record.channel(channel)?;
                y.is_finite()
                    .then(|| DataPoint::new(datetime_to_unix_millis(record.timestamp), y))
            })
            .collect())
    }

    /// Min and max of one channel across all records.
    pub fn channel_extent(&self, channel: &str) -> ChartResult<(f64, f64)> {
        let points = self.points(channel)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for point in &points {
            min = min.min(point.y);
            max = max.max(point.y);
        }
        if min > max {
            return Err(ChartError::InvalidData(format!(
                "channel `{channel}` has no finite values"
            )));
        }
        Ok((min, max))
    }

    #[must_use]
    pub fn records_in_window(&self, window: TimeWindow) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|record| window.contains(record.timestamp))
            .collect()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
