pub mod dataset;
pub mod line_series;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod time_window;
pub mod types;
pub mod window_policy;

pub use dataset::{Dataset, Record};
pub use line_series::{LineSegment, points_in_time_window, project_line_segments};
pub use scale::LinearScale;
pub use time_scale::TimeScale;
pub use time_window::TimeWindow;
pub use types::{DataPoint, Viewport};
pub use window_policy::{DEFAULT_LOOKBACK_MONTHS, MonthArithmetic, default_window, subtract_months};
