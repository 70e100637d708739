use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use tracing::trace;

use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};

use super::{GesturePhase, InteractionMode, SourceEvent};

/// Wheel delta (pixels) to log2 zoom factor.
const WHEEL_DELTA_SCALE: f64 = 0.002;

pub type ZoomEvents = SmallVec<[ZoomEvent; 3]>;

/// Horizontal zoom transform: `screen = world * k + x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    #[must_use]
    pub fn apply_x(self, world: f64) -> f64 {
        world * self.k + self.x
    }

    #[must_use]
    pub fn invert_x(self, screen: f64) -> f64 {
        (screen - self.x) / self.k
    }

    /// Translation in world units, i.e. pre-scale.
    #[must_use]
    pub fn translate(self, tx: f64) -> Self {
        Self {
            k: self.k,
            x: self.x + self.k * tx,
        }
    }

    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            k: self.k * factor,
            x: self.x,
        }
    }

    /// Reference scale seen through this transform: same pixel range, domain
    /// narrowed (or shifted) to what is now visible.
    pub fn rescale(self, reference: LinearScale) -> ChartResult<LinearScale> {
        let (r0, r1) = reference.range();
        let d0 = reference.invert(self.invert_x(r0));
        let d1 = reference.invert(self.invert_x(r1));
        reference.with_domain((d0, d1))
    }

    #[must_use]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Constraints applied to every transform the behavior produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Allowed `[min, max]` for `k`.
    pub scale_extent: (f64, f64),
    /// Viewport pixel interval.
    pub extent: (f64, f64),
    /// World pixel interval the viewport may never leave.
    pub translate_extent: (f64, f64),
}

impl ZoomConfig {
    /// No zooming out past the full extent and no panning beyond it.
    #[must_use]
    pub fn clamped_to_range(range: (f64, f64)) -> Self {
        Self {
            scale_extent: (1.0, f64::INFINITY),
            extent: range,
            translate_extent: range,
        }
    }

    /// Caps how far in the behavior may zoom. Never below the minimum scale.
    #[must_use]
    pub fn with_max_scale(mut self, max_k: f64) -> Self {
        self.scale_extent.1 = max_k.max(self.scale_extent.0);
        self
    }

    fn validate(self) -> ChartResult<Self> {
        let (min_k, max_k) = self.scale_extent;
        if !min_k.is_finite() || min_k <= 0.0 || max_k.is_nan() || max_k < min_k {
            return Err(ChartError::InvalidData(
                "zoom scale extent must satisfy 0 < min <= max".to_owned(),
            ));
        }
        for (name, (a, b)) in [
            ("extent", self.extent),
            ("translate extent", self.translate_extent),
        ] {
            if !a.is_finite() || !b.is_finite() || a >= b {
                return Err(ChartError::InvalidData(format!(
                    "zoom {name} must be finite and increasing"
                )));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub phase: GesturePhase,
    pub transform: ZoomTransform,
    pub source: Option<SourceEvent>,
}

impl ZoomEvent {
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        self.source.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveGesture {
    Wheel,
    Drag { grab_world: f64 },
}

/// Zoom/pan gesture state over one horizontal axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomBehavior {
    config: ZoomConfig,
    transform: ZoomTransform,
    active: Option<ActiveGesture>,
}

impl ZoomBehavior {
    pub fn new(config: ZoomConfig) -> ChartResult<Self> {
        Ok(Self {
            config: config.validate()?,
            transform: ZoomTransform::IDENTITY,
            active: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> ZoomConfig {
        self.config
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.transform
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        match self.active {
            None => InteractionMode::Idle,
            Some(ActiveGesture::Wheel) => InteractionMode::Zooming,
            Some(ActiveGesture::Drag { .. }) => InteractionMode::Panning,
        }
    }

    /// Scroll zoom anchored at `anchor_x`; negative `delta_y` zooms in.
    ///
    /// Starts a wheel gesture when idle. The gesture stays open until
    /// `end_gesture` is called.
    pub fn wheel(&mut self, anchor_x: f64, delta_y: f64) -> ChartResult<ZoomEvents> {
        if !anchor_x.is_finite() || !delta_y.is_finite() {
            return Err(ChartError::InvalidData(
                "wheel input must be finite".to_owned(),
            ));
        }

        let source = Some(SourceEvent::Wheel {
            x: anchor_x,
            delta_y,
        });
        let mut events = ZoomEvents::new();
        if self.active.is_none() {
            self.active = Some(ActiveGesture::Wheel);
            events.push(self.event(GesturePhase::Start, source));
        }

        let (min_k, max_k) = self.config.scale_extent;
        let k = (self.transform.k * (-delta_y * WHEEL_DELTA_SCALE).exp2()).clamp(min_k, max_k);
        let anchor_world = self.transform.invert_x(anchor_x);
        let next = ZoomTransform {
            k,
            x: anchor_x - anchor_world * k,
        };
        self.transform = self.constrain(next);
        trace!(k = self.transform.k, x = self.transform.x, "wheel zoom");

        events.push(self.event(GesturePhase::Active, source));
        Ok(events)
    }

    pub fn drag_start(&mut self, x: f64) -> ChartResult<ZoomEvents> {
        if !x.is_finite() {
            return Err(ChartError::InvalidData(
                "drag position must be finite".to_owned(),
            ));
        }

        let source = Some(SourceEvent::PointerDown { x });
        let mut events = ZoomEvents::new();
        if self.active.is_some() {
            events.push(self.event(GesturePhase::End, source));
        }
        self.active = Some(ActiveGesture::Drag {
            grab_world: self.transform.invert_x(x),
        });
        events.push(self.event(GesturePhase::Start, source));
        Ok(events)
    }

    /// Pans so the world point grabbed at `drag_start` sits under `x`.
    ///
    /// Ignored (no events) when no drag is in progress.
    pub fn drag_to(&mut self, x: f64) -> ChartResult<ZoomEvents> {
        if !x.is_finite() {
            return Err(ChartError::InvalidData(
                "drag position must be finite".to_owned(),
            ));
        }
        let Some(ActiveGesture::Drag { grab_world }) = self.active else {
            return Ok(ZoomEvents::new());
        };

        let next = ZoomTransform {
            k: self.transform.k,
            x: x - grab_world * self.transform.k,
        };
        self.transform = self.constrain(next);
        trace!(k = self.transform.k, x = self.transform.x, "drag pan");
        Ok(smallvec![
            self.event(GesturePhase::Active, Some(SourceEvent::PointerMove { x }))
        ])
    }

    /// Closes the current gesture. Ignored when idle.
    pub fn end_gesture(&mut self, x: f64) -> ZoomEvents {
        if self.active.take().is_none() {
            return ZoomEvents::new();
        }
        smallvec![self.event(GesturePhase::End, Some(SourceEvent::PointerUp { x }))]
    }

    /// Programmatic update; events carry no source.
    pub fn set_transform(&mut self, transform: ZoomTransform) -> ChartResult<ZoomEvents> {
        if !transform.k.is_finite() || transform.k <= 0.0 || !transform.x.is_finite() {
            return Err(ChartError::InvalidData(
                "zoom transform must be finite with k > 0".to_owned(),
            ));
        }

        let (min_k, max_k) = self.config.scale_extent;
        let clamped = ZoomTransform {
            k: transform.k.clamp(min_k, max_k),
            x: transform.x,
        };
        self.active = None;
        self.transform = self.constrain(clamped);
        Ok(smallvec![
            self.event(GesturePhase::Start, None),
            self.event(GesturePhase::Active, None),
            self.event(GesturePhase::End, None),
        ])
    }

    fn event(&self, phase: GesturePhase, source: Option<SourceEvent>) -> ZoomEvent {
        ZoomEvent {
            phase,
            transform: self.transform,
            source,
        }
    }

    fn constrain(&self, transform: ZoomTransform) -> ZoomTransform {
        let (e0, e1) = self.config.extent;
        let (t0, t1) = self.config.translate_extent;
        let dx0 = transform.invert_x(e0) - t0;
        let dx1 = transform.invert_x(e1) - t1;
        let shift = if dx1 > dx0 {
            (dx0 + dx1) / 2.0
        } else if dx0 < 0.0 {
            dx0
        } else {
            dx1.max(0.0)
        };
        transform.translate(shift)
    }
}
