//! Gesture adapters for the two linked views.
//!
//! `ZoomBehavior` and `BrushBehavior` own the gesture-local state (current
//! transform, current selection) and turn raw pointer input into events.
//! Every event carries `source: Option<SourceEvent>`; it is `Some` only for
//! genuine user input and `None` for programmatic updates. Controllers use
//! that flag to decide whether a change must be broadcast.

mod brush;
mod zoom;

pub use brush::{BrushBehavior, BrushEvent, BrushEvents};
pub use zoom::{ZoomBehavior, ZoomConfig, ZoomEvent, ZoomEvents, ZoomTransform};

use serde::{Deserialize, Serialize};

/// Lifecycle stage of one gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GesturePhase {
    Start,
    Active,
    End,
}

/// Raw input that produced a gesture event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SourceEvent {
    PointerDown { x: f64 },
    PointerMove { x: f64 },
    PointerUp { x: f64 },
    Wheel { x: f64, delta_y: f64 },
    DoubleClick { x: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Zooming,
    Panning,
    Brushing,
}
