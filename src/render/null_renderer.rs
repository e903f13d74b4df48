use crate::error::ChartResult;
use crate::render::{FrameSummary, RenderFrame, Renderer};

/// Headless renderer: validates frames and records what they held.
///
/// Used by tests and by hosts that only need the engine's state, not pixels.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_summary: FrameSummary,
    pub last_had_background: bool,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_summary = frame.summary();
        self.last_had_background = frame.background.is_some();
        Ok(())
    }
}
