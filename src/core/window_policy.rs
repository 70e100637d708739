use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Dataset, TimeWindow};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_LOOKBACK_MONTHS: u32 = 3;

/// How "N months earlier" treats a day-of-month missing in the target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonthArithmetic {
    /// Clamp to the target month's last day: May 31 - 3 months = Feb 29/28.
    #[default]
    Clamp,
    /// Roll the surplus days into the next month: Dec 31 - 3 months = Oct 1.
    Overflow,
}

/// Default visible window: the most recent `lookback_months` calendar months
/// of data, ending at the latest timestamp.
pub fn default_window(
    dataset: &Dataset,
    lookback_months: u32,
    arithmetic: MonthArithmetic,
) -> ChartResult<TimeWindow> {
    let end = dataset.extent()?.end();
    let start = subtract_months(end, lookback_months, arithmetic)?;
    Ok(TimeWindow::new(start, end))
}

pub fn subtract_months(
    time: DateTime<Utc>,
    months: u32,
    arithmetic: MonthArithmetic,
) -> ChartResult<DateTime<Utc>> {
    let result = match arithmetic {
        MonthArithmetic::Clamp => time.checked_sub_months(Months::new(months)),
        MonthArithmetic::Overflow => overflowing_sub_months(time, months),
    };
    result.ok_or_else(|| {
        ChartError::InvalidData(format!("cannot subtract {months} months from {time}"))
    })
}

fn overflowing_sub_months(time: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    let total = time.year() * 12 + time.month0() as i32 - i32::try_from(months).ok()?;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    let date = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?
        .checked_add_days(Days::new(u64::from(time.day() - 1)))?;
    Some(date.and_time(time.time()).and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{MonthArithmetic, default_window, subtract_months};
    use crate::core::{Dataset, Record};
    use crate::error::ChartError;

    #[test]
    fn empty_dataset_fails_fast() {
        let err = default_window(&Dataset::new(Vec::new()), 3, MonthArithmetic::Clamp)
            .expect_err("must fail");
        assert!(matches!(err, ChartError::EmptyDataset));
    }

    #[test]
    fn zero_months_yields_degenerate_window() {
        let last = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        let dataset = Dataset::new(vec![Record::new(last).with_channel("data", 1.0)]);
        let window = default_window(&dataset, 0, MonthArithmetic::Clamp).expect("window");
        assert!(window.is_degenerate());
    }

    #[test]
    fn overflow_crosses_year_boundary() {
        let time = Utc.with_ymd_and_hms(2024, 2, 15, 8, 30, 0).unwrap();
        let start = subtract_months(time, 3, MonthArithmetic::Overflow).expect("subtract");
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 11, 15, 8, 30, 0).unwrap());
    }
}
