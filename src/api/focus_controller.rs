use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Dataset, LinearScale, TimeScale, TimeWindow};
use crate::error::ChartResult;
use crate::interaction::{
    GesturePhase, InteractionMode, ZoomBehavior, ZoomConfig, ZoomEvent, ZoomEvents, ZoomTransform,
};
use crate::render::{Axis, Plot, PlotSpec, Plotter, RenderFrame, Tooltip};

use super::{ControllerId, FocusContextConfig, Origin, WindowChange, WindowChannel};

/// Inspectable copy of the focus view state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusSnapshot {
    pub window: TimeWindow,
    pub transform: ZoomTransform,
    pub render_count: u64,
}

struct FocusState<P: Plotter> {
    id: ControllerId,
    dataset: Dataset,
    config: FocusContextConfig,
    plotter: P,
    /// X scale of the initial full-extent render; gestures map through it.
    reference: TimeScale,
    full_extent: TimeWindow,
    /// Y scale of the initial render, reused so zooming never rescales y.
    y_scale: LinearScale,
    zoom: ZoomBehavior,
    window: TimeWindow,
    plot: Plot,
    render_count: u64,
}

impl<P: Plotter> FocusState<P> {
    fn redraw(&mut self, window: TimeWindow) -> ChartResult<()> {
        let spec = PlotSpec {
            x_domain: Some(window),
            y_scale: Some(self.y_scale),
            clip: true,
            tip: true,
            margins: self.config.margins,
            ..PlotSpec::new(
                &self.dataset,
                self.config.y_channel(),
                self.config.focus_viewport(),
            )
        };
        let plot = self.plotter.plot(&spec)?;
        self.plot = plot;
        self.window = window;
        self.render_count += 1;
        trace!(id = self.id.get(), render_count = self.render_count, "focus redraw");
        Ok(())
    }

    /// Re-renders for `Active` and `End` frames. Returns the window to
    /// broadcast when the frame came from real user input.
    fn on_zoom_event(&mut self, event: ZoomEvent) -> ChartResult<Option<TimeWindow>> {
        if event.phase == GesturePhase::Start {
            return Ok(None);
        }

        let window = match self.window_for(event.transform) {
            Ok(window) => window,
            Err(err) => {
                // keep the behavior in step with the displayed window
                let shown = self.transform_for(self.window);
                self.zoom.set_transform(shown)?;
                return Err(err);
            }
        };
        self.redraw(window)?;
        Ok(event.is_user_input().then_some(window))
    }

    /// Window shown through `transform`, never narrower than the minimum span.
    fn window_for(&self, transform: ZoomTransform) -> ChartResult<TimeWindow> {
        let domain = transform.rescale(self.reference.linear())?;
        TimeScale::from_linear(domain)
            .window()?
            .normalized(self.config.min_window_span())?
            .clamp_to(self.full_extent)
    }

    fn on_window_change(&mut self, change: &WindowChange) -> ChartResult<bool> {
        if change.is_from(self.id) {
            return Ok(false);
        }

        let requested = change.window.unwrap_or(self.full_extent);
        let window = requested
            .normalized(self.config.min_window_span())?
            .clamp_to(self.full_extent)?;
        let transform = self.transform_for(window);
        // programmatic: the returned events carry no source and are not replayed
        self.zoom.set_transform(transform)?;
        self.redraw(window)?;
        debug!(
            id = self.id.get(),
            origin = ?change.origin,
            ?window,
            k = transform.k,
            "focus applied remote window"
        );
        Ok(true)
    }

    /// Transform that makes the reference scale show `window`.
    fn transform_for(&self, window: TimeWindow) -> ZoomTransform {
        let (r0, _) = self.reference.range();
        let (d0, d1) = self.full_extent.as_millis();
        let (w0, w1) = window.as_millis();
        let k = (d1 - d0) / (w1 - w0);
        if !k.is_finite() || k <= 0.0 {
            return ZoomTransform::IDENTITY;
        }
        ZoomTransform::IDENTITY
            .translate(r0)
            .scale(k)
            .translate(-self.reference.linear().apply(w0))
    }
}

/// Detailed, zoomable view of the current window.
///
/// Owns its gesture state and current plot; learns about windows chosen
/// elsewhere only through the shared `WindowChannel`.
pub struct FocusController<P: Plotter + 'static> {
    state: Rc<RefCell<FocusState<P>>>,
    channel: Rc<WindowChannel>,
}

impl<P: Plotter + 'static> FocusController<P> {
    pub fn new(
        dataset: Dataset,
        config: FocusContextConfig,
        plotter: P,
        channel: Rc<WindowChannel>,
    ) -> ChartResult<Self> {
        let spec = PlotSpec {
            clip: true,
            tip: true,
            margins: config.margins,
            ..PlotSpec::new(&dataset, config.y_channel(), config.focus_viewport())
        };
        let plot = plotter.plot(&spec)?;
        let reference = plot.time_scale();
        let full_extent = reference.window()?;
        let y_scale = plot.scale(Axis::Y);
        let (d0, d1) = full_extent.as_millis();
        let max_k = (d1 - d0) / config.min_window_span_ms as f64;
        let zoom = ZoomBehavior::new(
            ZoomConfig::clamped_to_range(reference.range()).with_max_scale(max_k),
        )?;

        let id = channel.register();
        let state = Rc::new(RefCell::new(FocusState {
            id,
            dataset,
            config,
            plotter,
            reference,
            full_extent,
            y_scale,
            zoom,
            window: full_extent,
            plot,
            render_count: 1,
        }));

        let weak: Weak<RefCell<FocusState<P>>> = Rc::downgrade(&state);
        channel.subscribe(format!("focus.{}", id.get()), move |change| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Ok(mut state) = state.try_borrow_mut() else {
                warn!("focus view busy; dropping window change");
                return;
            };
            if let Err(err) = state.on_window_change(change) {
                warn!(error = %err, "focus view failed to apply window change");
            }
        })?;

        Ok(Self { state, channel })
    }

    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.state.borrow().id
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        Origin::Controller(self.id())
    }

    /// Currently displayed window.
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.state.borrow().window
    }

    /// Full data extent shown at identity zoom.
    #[must_use]
    pub fn full_extent(&self) -> TimeWindow {
        self.state.borrow().full_extent
    }

    #[must_use]
    pub fn reference_scale(&self) -> TimeScale {
        self.state.borrow().reference
    }

    #[must_use]
    pub fn transform(&self) -> ZoomTransform {
        self.state.borrow().zoom.transform()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.state.borrow().zoom.mode()
    }

    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.state.borrow().render_count
    }

    #[must_use]
    pub fn snapshot(&self) -> FocusSnapshot {
        let state = self.state.borrow();
        FocusSnapshot {
            window: state.window,
            transform: state.zoom.transform(),
            render_count: state.render_count,
        }
    }

    /// Current drawable. Replaced on every re-render.
    #[must_use]
    pub fn plot(&self) -> Ref<'_, Plot> {
        Ref::map(self.state.borrow(), |state| &state.plot)
    }

    #[must_use]
    pub fn plotter(&self) -> Ref<'_, P> {
        Ref::map(self.state.borrow(), |state| &state.plotter)
    }

    #[must_use]
    pub fn render(&self) -> RenderFrame {
        self.state.borrow().plot.frame().clone()
    }

    #[must_use]
    pub fn tooltip_at(&self, pointer_x: f64) -> Option<Tooltip> {
        self.state.borrow().plot.tooltip_at(pointer_x)
    }

    pub fn wheel(&self, anchor_x: f64, delta_y: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().zoom.wheel(anchor_x, delta_y)?;
        self.dispatch(events)
    }

    pub fn drag_start(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().zoom.drag_start(x)?;
        self.dispatch(events)
    }

    pub fn drag_to(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().zoom.drag_to(x)?;
        self.dispatch(events)
    }

    /// Ends the running drag or wheel gesture.
    pub fn end_gesture(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().zoom.end_gesture(x);
        self.dispatch(events)
    }

    /// Entry point for hosts driving their own gesture recognizer.
    pub fn on_zoom_event(&self, event: ZoomEvent) -> ChartResult<()> {
        let broadcast = self.state.borrow_mut().on_zoom_event(event)?;
        if let Some(window) = broadcast {
            self.channel.publish(self.origin(), Some(window))?;
        }
        Ok(())
    }

    /// Applies a change as if it arrived over the channel.
    pub fn handle_window_change(&self, change: &WindowChange) -> ChartResult<bool> {
        self.state.borrow_mut().on_window_change(change)
    }

    fn dispatch(&self, events: ZoomEvents) -> ChartResult<()> {
        for event in events {
            self.on_zoom_event(event)?;
        }
        Ok(())
    }
}
