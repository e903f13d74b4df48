use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LinePrimitive, PolygonPrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene of one chart draw pass.
///
/// Layers are drawn in field order: background, polygons (confidence fill,
/// arrow badges), rects (candles, bars, boxes), lines (sentiment, crosshair)
/// and finally texts.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub background: Option<Color>,
    pub polygons: Vec<PolygonPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

/// Primitive counts of a frame, cheap to keep around after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameSummary {
    pub polygons: usize,
    pub rects: usize,
    pub lines: usize,
    pub texts: usize,
}

impl FrameSummary {
    #[must_use]
    pub fn total(self) -> usize {
        self.polygons + self.rects + self.lines + self.texts
    }
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            background: None,
            polygons: Vec::new(),
            rects: Vec::new(),
            lines: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Appends every primitive of `other`; viewport and background stay.
    pub fn extend(&mut self, other: RenderFrame) {
        self.polygons.extend(other.polygons);
        self.rects.extend(other.rects);
        self.lines.extend(other.lines);
        self.texts.extend(other.texts);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if let Some(background) = self.background {
            background.validate()?;
        }
        self.polygons.iter().try_for_each(PolygonPrimitive::validate)?;
        self.rects.iter().try_for_each(|rect| rect.validate())?;
        self.lines.iter().try_for_each(|line| line.validate())?;
        self.texts.iter().try_for_each(TextPrimitive::validate)
    }

    #[must_use]
    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            polygons: self.polygons.len(),
            rects: self.rects.len(),
            lines: self.lines.len(),
            texts: self.texts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary().total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Viewport;
    use crate::render::{Color, RectPrimitive};

    #[test]
    fn summary_counts_each_layer() {
        let mut frame = RenderFrame::new(Viewport::new(100, 50)).with_background(Color::rgb(0.0, 0.0, 0.0));
        assert!(frame.is_empty());
        frame
            .rects
            .push(RectPrimitive::new(1.0, 1.0, 4.0, 4.0, Color::rgb(1.0, 1.0, 1.0)));
        let summary = frame.summary();
        assert_eq!(summary.rects, 1);
        assert_eq!(summary.total(), 1);
        frame.validate().expect("valid frame");
    }

    #[test]
    fn zero_viewport_is_rejected() {
        let frame = RenderFrame::new(Viewport::new(0, 50));
        assert!(frame.validate().is_err());
    }
}
