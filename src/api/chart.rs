use std::rc::Rc;

use tracing::debug;

use crate::core::{Dataset, TimeWindow, Viewport, default_window};
use crate::error::ChartResult;
use crate::render::{LinePlotter, Plotter, RenderFrame, Renderer};

use super::{ContextController, FocusContextConfig, FocusController, Origin, WindowChannel};

/// Focus view stacked above a context overview, both bound to one time
/// window.
///
/// This is the only construction entry point: it builds both controllers on
/// a private channel and seeds them with the default window.
pub struct FocusContextChart<P: Plotter + 'static = LinePlotter> {
    config: FocusContextConfig,
    dataset: Dataset,
    channel: Rc<WindowChannel>,
    focus: FocusController<P>,
    context: ContextController,
}

impl FocusContextChart<LinePlotter> {
    pub fn new(dataset: impl Into<Dataset>, config: FocusContextConfig) -> ChartResult<Self> {
        Self::with_plotter(dataset, config, LinePlotter::default())
    }
}

impl<P: Plotter + 'static> FocusContextChart<P> {
    pub fn with_plotter(
        dataset: impl Into<Dataset>,
        config: FocusContextConfig,
        plotter: P,
    ) -> ChartResult<Self> {
        let dataset = dataset.into();
        config.validate()?;
        let initial = default_window(&dataset, config.lookback_months, config.month_arithmetic)?;
        dataset.ensure_channel(config.y_channel())?;

        let channel = Rc::new(WindowChannel::new());
        let focus = FocusController::new(
            dataset.clone(),
            config.clone(),
            plotter,
            Rc::clone(&channel),
        )?;
        let context = ContextController::new(
            dataset.clone(),
            &config,
            &*focus.plotter(),
            Rc::clone(&channel),
        )?;
        debug!(
            records = dataset.len(),
            width = config.width,
            channel = config.y_channel(),
            "focus/context chart created"
        );

        channel.publish(Origin::Reset, Some(initial))?;

        Ok(Self {
            config,
            dataset,
            channel,
            focus,
            context,
        })
    }

    #[must_use]
    pub fn config(&self) -> &FocusContextConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn channel(&self) -> &Rc<WindowChannel> {
        &self.channel
    }

    #[must_use]
    pub fn focus(&self) -> &FocusController<P> {
        &self.focus
    }

    #[must_use]
    pub fn context(&self) -> &ContextController {
        &self.context
    }

    /// Last window published by either view or by a reset.
    #[must_use]
    pub fn current_window(&self) -> Option<TimeWindow> {
        self.channel.current()
    }

    /// Same as a double-click on the context view.
    pub fn reset_window(&self) -> ChartResult<TimeWindow> {
        self.context.double_click()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.config.width,
            self.config.focus_height + self.config.context_height,
        )
    }

    /// Container frame: focus on top, context with its brush below.
    #[must_use]
    pub fn compose_frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::new(self.viewport());
        frame.append_translated(&self.focus.render(), 0.0, 0.0);
        frame.append_translated(
            &self.context.render(),
            0.0,
            f64::from(self.config.focus_height),
        );
        frame
    }

    pub fn render<R: Renderer>(&self, renderer: &mut R) -> ChartResult<()> {
        renderer.render(&self.compose_frame())
    }
}
