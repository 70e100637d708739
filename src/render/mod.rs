mod frame;
mod line_plotter;
mod null_renderer;
mod plot;
mod primitives;

pub use frame::RenderFrame;
pub use line_plotter::{LinePlotStyle, LinePlotter};
pub use null_renderer::NullRenderer;
pub use plot::{Axis, Plot, PlotMargins, PlotSpec, Plotter, Tooltip};
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

use crate::error::ChartResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive the composed focus + context `RenderFrame`, so drawing
/// code stays isolated from window synchronization and gesture logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
