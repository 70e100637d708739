use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::core::{Dataset, MonthArithmetic, TimeScale, TimeWindow, default_window};
use crate::error::ChartResult;
use crate::interaction::{BrushBehavior, BrushEvent, BrushEvents, GesturePhase, InteractionMode};
use crate::render::{Axis, Color, Plot, PlotSpec, Plotter, RectPrimitive, RenderFrame};

use super::{ControllerId, FocusContextConfig, Origin, WindowChange, WindowChannel};

const BRUSH_FILL: Color = Color::rgba(0.47, 0.47, 0.47, 0.3);
const BRUSH_BORDER: Color = Color::rgb(1.0, 1.0, 1.0);

struct ContextState {
    id: ControllerId,
    dataset: Dataset,
    lookback_months: u32,
    month_arithmetic: MonthArithmetic,
    plot: Plot,
    brush: BrushBehavior,
    /// Last window this view knows about; `None` after a cleared brush.
    window: Option<TimeWindow>,
}

impl ContextState {
    fn time_scale(&self) -> TimeScale {
        self.plot.time_scale()
    }

    /// Returns `Some(window)` to broadcast when the event came from real
    /// user input; the inner option is `None` for a cleared brush.
    fn on_brush_event(&mut self, event: BrushEvent) -> ChartResult<Option<Option<TimeWindow>>> {
        if event.phase == GesturePhase::Start {
            return Ok(None);
        }

        let window = event
            .selection
            .map(|selection| self.time_scale().pixels_to_window(selection))
            .transpose()?;
        self.window = window;
        Ok(event.is_user_input().then_some(window))
    }

    fn on_window_change(&mut self, change: &WindowChange) -> ChartResult<bool> {
        if change.is_from(self.id) {
            return Ok(false);
        }
        let Some(window) = change.window else {
            return Ok(false);
        };

        self.window = Some(window);
        let (b0, b1) = self.time_scale().window_to_pixels(window);
        let (x1, x2) = self.brush.extent();
        if b1 < x1 || b0 > x2 {
            self.brush.clear();
            debug!(id = self.id.get(), ?window, "context window outside extent; brush cleared");
        } else {
            self.brush
                .move_to(Some((b0.max(x1), b1.min(x2))))?;
            debug!(id = self.id.get(), ?window, "context brush moved");
        }
        Ok(true)
    }
}

/// Full-range overview with a brush marking the current window.
///
/// The overview is drawn once; only the brush changes afterwards.
pub struct ContextController {
    state: Rc<RefCell<ContextState>>,
    channel: Rc<WindowChannel>,
}

impl ContextController {
    pub fn new<P: Plotter>(
        dataset: Dataset,
        config: &FocusContextConfig,
        plotter: &P,
        channel: Rc<WindowChannel>,
    ) -> ChartResult<Self> {
        let spec = PlotSpec {
            label: false,
            margins: config.margins,
            ..PlotSpec::new(&dataset, config.y_channel(), config.context_viewport())
        };
        let plot = plotter.plot(&spec)?;
        let brush = BrushBehavior::new(ordered(plot.time_scale().range()))?;

        let id = channel.register();
        let state = Rc::new(RefCell::new(ContextState {
            id,
            dataset,
            lookback_months: config.lookback_months,
            month_arithmetic: config.month_arithmetic,
            plot,
            brush,
            window: None,
        }));

        let weak: Weak<RefCell<ContextState>> = Rc::downgrade(&state);
        channel.subscribe(format!("context.{}", id.get()), move |change| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Ok(mut state) = state.try_borrow_mut() else {
                warn!("context view busy; dropping window change");
                return;
            };
            if let Err(err) = state.on_window_change(change) {
                warn!(error = %err, "context view failed to apply window change");
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

    /// Brush selection in pixels, `None` when cleared.
    #[must_use]
    pub fn selection(&self) -> Option<(f64, f64)> {
        self.state.borrow().brush.selection()
    }

    /// Time window under the brush, `None` when cleared.
    pub fn selected_window(&self) -> ChartResult<Option<TimeWindow>> {
        let state = self.state.borrow();
        state
            .brush
            .selection()
            .map(|selection| state.time_scale().pixels_to_window(selection))
            .transpose()
    }

    /// Last window this view received or produced.
    #[must_use]
    pub fn window(&self) -> Option<TimeWindow> {
        self.state.borrow().window
    }

    #[must_use]
    pub fn brush_extent(&self) -> (f64, f64) {
        self.state.borrow().brush.extent()
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.state.borrow().brush.mode()
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        self.state.borrow().time_scale()
    }

    #[must_use]
    pub fn plot(&self) -> Ref<'_, Plot> {
        Ref::map(self.state.borrow(), |state| &state.plot)
    }

    /// Overview frame with the brush drawn on top.
    #[must_use]
    pub fn render(&self) -> RenderFrame {
        let state = self.state.borrow();
        let mut frame = state.plot.frame().clone();
        if let Some((lo, hi)) = state.brush.selection() {
            let (bottom, top) = state.plot.scale(Axis::Y).range();
            frame.rects.push(
                RectPrimitive::new(lo, top, hi - lo, bottom - top, BRUSH_FILL)
                    .with_border(1.0, BRUSH_BORDER),
            );
        }
        frame
    }

    pub fn brush_start(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().brush.brush_start(x)?;
        self.dispatch(events)
    }

    pub fn brush_to(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().brush.brush_to(x)?;
        self.dispatch(events)
    }

    pub fn brush_end(&self, x: f64) -> ChartResult<()> {
        let events = self.state.borrow_mut().brush.brush_end(x);
        self.dispatch(events)
    }

    /// Resets both views to the default window.
    pub fn double_click(&self) -> ChartResult<TimeWindow> {
        let window = {
            let state = self.state.borrow();
            default_window(&state.dataset, state.lookback_months, state.month_arithmetic)?
        };
        self.channel.publish(Origin::Reset, Some(window))?;
        Ok(window)
    }

    /// Entry point for hosts driving their own brush recognizer.
    pub fn on_brush_event(&self, event: BrushEvent) -> ChartResult<()> {
        let broadcast = self.state.borrow_mut().on_brush_event(event)?;
        if let Some(window) = broadcast {
            self.channel.publish(self.origin(), window)?;
        }
        Ok(())
    }

    /// Applies a change as if it arrived over the channel.
    pub fn handle_window_change(&self, change: &WindowChange) -> ChartResult<bool> {
        self.state.borrow_mut().on_window_change(change)
    }

    fn dispatch(&self, events: BrushEvents) -> ChartResult<()> {
        for event in events {
            self.on_brush_event(event)?;
        }
        Ok(())
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}
