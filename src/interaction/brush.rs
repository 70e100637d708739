use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

use super::{GesturePhase, InteractionMode, SourceEvent};

pub type BrushEvents = SmallVec<[BrushEvent; 3]>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushEvent {
    pub phase: GesturePhase,
    /// Ordered pixel interval, `None` when the brush is cleared.
    pub selection: Option<(f64, f64)>,
    pub source: Option<SourceEvent>,
}

impl BrushEvent {
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        self.source.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveBrush {
    /// New selection spanning from `anchor` to the pointer.
    Create { anchor: f64 },
    /// Existing selection dragged as a whole.
    Move { grab: f64, origin: (f64, f64) },
}

/// One-dimensional (x) brush over a fixed pixel extent.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushBehavior {
    extent: (f64, f64),
    selection: Option<(f64, f64)>,
    active: Option<ActiveBrush>,
}

impl BrushBehavior {
    pub fn new(extent: (f64, f64)) -> ChartResult<Self> {
        if !extent.0.is_finite() || !extent.1.is_finite() || extent.0 >= extent.1 {
            return Err(ChartError::InvalidData(
                "brush extent must be finite and increasing".to_owned(),
            ));
        }
        Ok(Self {
            extent,
            selection: None,
            active: None,
        })
    }

    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    #[must_use]
    pub fn selection(&self) -> Option<(f64, f64)> {
        self.selection
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.active.is_some() {
            InteractionMode::Brushing
        } else {
            InteractionMode::Idle
        }
    }

    /// Pressing inside the current selection grabs it for moving; pressing
    /// elsewhere starts a new selection at the pointer.
    pub fn brush_start(&mut self, x: f64) -> ChartResult<BrushEvents> {
        let x = self.clamp_input(x)?;
        let grabbed = self
            .selection
            .filter(|(lo, hi)| x >= *lo && x <= *hi && hi > lo);

        self.active = Some(match grabbed {
            Some(origin) => ActiveBrush::Move { grab: x, origin },
            None => {
                self.selection = Some((x, x));
                ActiveBrush::Create { anchor: x }
            }
        });
        Ok(smallvec![self.event(
            GesturePhase::Start,
            Some(SourceEvent::PointerDown { x })
        )])
    }

    /// Ignored (no events) when no brush gesture is in progress.
    pub fn brush_to(&mut self, x: f64) -> ChartResult<BrushEvents> {
        let x = self.clamp_input(x)?;
        let Some(active) = self.active else {
            return Ok(BrushEvents::new());
        };

        self.selection = Some(match active {
            ActiveBrush::Create { anchor } => (anchor.min(x), anchor.max(x)),
            ActiveBrush::Move { grab, origin } => {
                let (lo, hi) = self.extent;
                let delta = (x - grab).clamp(lo - origin.0, hi - origin.1);
                (origin.0 + delta, origin.1 + delta)
            }
        });
        trace!(selection = ?self.selection, "brush");
        Ok(smallvec![self.event(
            GesturePhase::Active,
            Some(SourceEvent::PointerMove { x })
        )])
    }

    /// Finishes the gesture. An empty selection (click without drag) clears
    /// the brush. Ignored when idle.
    pub fn brush_end(&mut self, x: f64) -> BrushEvents {
        if self.active.take().is_none() {
            return BrushEvents::new();
        }
        if matches!(self.selection, Some((lo, hi)) if lo >= hi) {
            self.selection = None;
        }
        smallvec![self.event(GesturePhase::End, Some(SourceEvent::PointerUp { x }))]
    }

    /// Programmatic move; `None` clears. Events carry no source.
    pub fn move_to(&mut self, selection: Option<(f64, f64)>) -> ChartResult<BrushEvents> {
        let selection = match selection {
            Some((a, b)) => {
                if !a.is_finite() || !b.is_finite() {
                    return Err(ChartError::InvalidData(
                        "brush selection must be finite".to_owned(),
                    ));
                }
                Some((a.min(b), a.max(b)))
            }
            None => None,
        };

        self.active = None;
        self.selection = selection;
        Ok(smallvec![
            self.event(GesturePhase::Start, None),
            self.event(GesturePhase::Active, None),
            self.event(GesturePhase::End, None),
        ])
    }

    pub fn clear(&mut self) -> BrushEvents {
        self.active = None;
        self.selection = None;
        smallvec![
            self.event(GesturePhase::Start, None),
            self.event(GesturePhase::Active, None),
            self.event(GesturePhase::End, None),
        ]
    }

    fn clamp_input(&self, x: f64) -> ChartResult<f64> {
        if !x.is_finite() {
            return Err(ChartError::InvalidData(
                "brush position must be finite".to_owned(),
            ));
        }
        Ok(x.clamp(self.extent.0, self.extent.1))
    }

    fn event(&self, phase: GesturePhase, source: Option<SourceEvent>) -> BrushEvent {
        BrushEvent {
            phase,
            selection: self.selection,
            source,
        }
    }
}
