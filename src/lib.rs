//! focus-context-rs: linked focus + context time-series views.
//!
//! A detailed, zoomable focus plot and a full-range overview with a brush are
//! kept on one shared time window. Window changes travel over a typed channel
//! tagged with their origin so no view reacts to its own echo.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{FocusContextChart, FocusContextConfig};
pub use error::{ChartError, ChartResult};
