use serde::{Deserialize, Serialize};

use crate::core::{TimeScaleTuning, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::extensions::MarkerLayout;
use crate::render::ChartStyle;

/// Creation options of a chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceOptions {
    pub viewport: Viewport,
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub time_scale_tuning: TimeScaleTuning,
    #[serde(default)]
    pub marker_layout: MarkerLayout,
}

impl SurfaceOptions {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            style: ChartStyle::default(),
            time_scale_tuning: TimeScaleTuning::default(),
            marker_layout: MarkerLayout::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_time_scale_tuning(mut self, tuning: TimeScaleTuning) -> Self {
        self.time_scale_tuning = tuning;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        self.style.validate()?;
        self.time_scale_tuning.validate()?;
        self.marker_layout.validate()?;
        Ok(self)
    }
}

/// Partial update for [`SurfaceOptions`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceOptionsPatch {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub style: Option<ChartStyle>,
    pub time_scale_tuning: Option<TimeScaleTuning>,
}

impl SurfaceOptionsPatch {
    #[must_use]
    pub fn width(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Applies the patch on top of `current` and validates the result.
    pub fn apply_to(self, current: SurfaceOptions) -> ChartResult<SurfaceOptions> {
        let mut next = current;
        if let Some(width) = self.width {
            next.viewport.width = width;
        }
        if let Some(height) = self.height {
            next.viewport.height = height;
        }
        if let Some(style) = self.style {
            next.style = style;
        }
        if let Some(tuning) = self.time_scale_tuning {
            next.time_scale_tuning = tuning;
        }
        next.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{SurfaceOptions, SurfaceOptionsPatch};
    use crate::core::Viewport;

    #[test]
    fn width_patch_keeps_height() {
        let options = SurfaceOptions::new(Viewport::new(800, 600));
        let next = SurfaceOptionsPatch::width(1024)
            .apply_to(options)
            .expect("valid patch");
        assert_eq!(next.viewport, Viewport::new(1024, 600));
    }

    #[test]
    fn zero_width_patch_is_rejected() {
        let options = SurfaceOptions::new(Viewport::new(800, 600));
        assert!(SurfaceOptionsPatch::width(0).apply_to(options).is_err());
    }
}
