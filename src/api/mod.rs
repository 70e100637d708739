//! Public entry points: the composed chart, its two views, and the shared
//! window channel that keeps them in step.

mod chart;
mod config;
mod context_controller;
mod focus_controller;
mod window_channel;

pub use chart::FocusContextChart;
pub use config::FocusContextConfig;
pub use context_controller::ContextController;
pub use focus_controller::{FocusController, FocusSnapshot};
pub use window_channel::{ControllerId, Origin, WindowChange, WindowChannel, WindowHandler};
