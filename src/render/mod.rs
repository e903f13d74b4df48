mod frame;
mod null_renderer;
mod primitives;
mod style;

pub use frame::{FrameSummary, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use style::ChartStyle;

use crate::error::ChartResult;

/// Drawing backend for the orchestrator.
///
/// A backend only sees pixels: every series has already been projected into
/// the frame by the surface.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
