use serde::{Deserialize, Serialize};

use crate::core::scale::{LinearScale, PixelRange};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for `fit_content`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScaleTuning {
    pub left_padding_ratio: f64,
    pub right_padding_ratio: f64,
    pub min_span_absolute: f64,
}

impl Default for TimeScaleTuning {
    fn default() -> Self {
        Self {
            left_padding_ratio: 0.02,
            right_padding_ratio: 0.02,
            min_span_absolute: 1.0,
        }
    }
}

impl TimeScaleTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.left_padding_ratio.is_finite()
            || !self.right_padding_ratio.is_finite()
            || self.left_padding_ratio < 0.0
            || self.right_padding_ratio < 0.0
        {
            return Err(ChartError::InvalidData(
                "time scale padding ratios must be finite and >= 0".to_owned(),
            ));
        }

        if !self.min_span_absolute.is_finite() || self.min_span_absolute <= 0.0 {
            return Err(ChartError::InvalidData(
                "time scale min span must be finite and > 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

/// Shared horizontal axis of the surface.
///
/// `full_*` tracks the last fitted data range; `visible_*` is the window the
/// user sees and is only changed by fitting, zooming or explicit ranges.
/// Width changes never touch it: pixel mapping takes the width per call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    full_start: f64,
    full_end: f64,
    visible_start: f64,
    visible_end: f64,
}

impl TimeScale {
    pub fn new(time_start: f64, time_end: f64) -> ChartResult<Self> {
        let (start, end) = normalize_range(time_start, time_end, 1.0)?;
        Ok(Self {
            full_start: start,
            full_end: end,
            visible_start: start,
            visible_end: end,
        })
    }

    #[must_use]
    pub fn full_range(self) -> (f64, f64) {
        (self.full_start, self.full_end)
    }

    #[must_use]
    pub fn visible_range(self) -> (f64, f64) {
        (self.visible_start, self.visible_end)
    }

    pub fn set_visible_range(&mut self, start: f64, end: f64) -> ChartResult<()> {
        let (start, end) = normalize_range(start, end, 1e-9)?;
        self.visible_start = start;
        self.visible_end = end;
        Ok(())
    }

    /// Fits full and visible ranges to the given sample times.
    ///
    /// Returns `Ok(false)` and leaves the scale untouched when no finite time
    /// is supplied.
    pub fn fit_to_times(
        &mut self,
        times: impl IntoIterator<Item = f64>,
        tuning: TimeScaleTuning,
    ) -> ChartResult<bool> {
        let tuning = tuning.validate()?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for time in times.into_iter().filter(|time| time.is_finite()) {
            min = min.min(time);
            max = max.max(time);
        }
        if min > max {
            return Ok(false);
        }

        let (full_start, full_end) = normalize_range(min, max, tuning.min_span_absolute)?;
        let span = full_end - full_start;
        self.full_start = full_start;
        self.full_end = full_end;
        self.visible_start = full_start - span * tuning.left_padding_ratio;
        self.visible_end = full_end + span * tuning.right_padding_ratio;
        Ok(true)
    }

    /// Moves both visible edges inward by `ratio` of the current span.
    ///
    /// Negative ratios move them outward. The window never inverts.
    pub fn inset_visible_range(&mut self, ratio: f64) -> ChartResult<()> {
        if !ratio.is_finite() || ratio >= 0.5 {
            return Err(ChartError::InvalidData(
                "visible range inset ratio must be finite and < 0.5".to_owned(),
            ));
        }
        let span = self.visible_end - self.visible_start;
        self.set_visible_range(
            self.visible_start + span * ratio,
            self.visible_end - span * ratio,
        )
    }

    pub fn time_to_pixel(self, time: f64, width: u32) -> ChartResult<f64> {
        self.visible_linear()?
            .domain_to_pixel(time, PixelRange::horizontal(width))
    }

    pub fn pixel_to_time(self, pixel: f64, width: u32) -> ChartResult<f64> {
        self.visible_linear()?
            .pixel_to_domain(pixel, PixelRange::horizontal(width))
    }

    /// Pixel distance between two times at the given width.
    pub fn span_to_pixels(self, span: f64, width: u32) -> ChartResult<f64> {
        let origin = self.time_to_pixel(self.visible_start, width)?;
        let shifted = self.time_to_pixel(self.visible_start + span, width)?;
        Ok((shifted - origin).abs())
    }

    fn visible_linear(self) -> ChartResult<LinearScale> {
        LinearScale::new(self.visible_start, self.visible_end)
    }
}

fn normalize_range(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}

#[cfg(test)]
mod tests {
    use super::{TimeScale, TimeScaleTuning};

    #[test]
    fn fit_applies_padding_around_full_range() {
        let mut scale = TimeScale::new(0.0, 1.0).expect("scale");
        let tuning = TimeScaleTuning {
            left_padding_ratio: 0.1,
            right_padding_ratio: 0.1,
            min_span_absolute: 1.0,
        };
        assert!(
            scale
                .fit_to_times([100.0, 200.0], tuning)
                .expect("fit succeeds")
        );
        assert_eq!(scale.full_range(), (100.0, 200.0));
        assert_eq!(scale.visible_range(), (90.0, 210.0));
    }

    #[test]
    fn fit_without_times_keeps_current_window() {
        let mut scale = TimeScale::new(5.0, 15.0).expect("scale");
        let fitted = scale
            .fit_to_times(std::iter::empty(), TimeScaleTuning::default())
            .expect("fit");
        assert!(!fitted);
        assert_eq!(scale.visible_range(), (5.0, 15.0));
    }

    #[test]
    fn single_sample_fit_uses_min_span() {
        let mut scale = TimeScale::new(0.0, 1.0).expect("scale");
        let tuning = TimeScaleTuning {
            left_padding_ratio: 0.0,
            right_padding_ratio: 0.0,
            min_span_absolute: 10.0,
        };
        scale.fit_to_times([50.0], tuning).expect("fit");
        assert_eq!(scale.visible_range(), (45.0, 55.0));
    }

    #[test]
    fn inset_shrinks_and_grows_symmetrically() {
        let mut scale = TimeScale::new(0.0, 100.0).expect("scale");
        scale.inset_visible_range(0.2).expect("zoom in");
        assert_eq!(scale.visible_range(), (20.0, 80.0));
        scale.inset_visible_range(-0.1).expect("zoom out");
        assert_eq!(scale.visible_range(), (14.0, 86.0));
        assert!(scale.inset_visible_range(0.5).is_err());
    }

    #[test]
    fn pixel_mapping_follows_width_without_changing_window() {
        let scale = TimeScale::new(0.0, 100.0).expect("scale");
        let narrow = scale.time_to_pixel(50.0, 400).expect("narrow");
        let wide = scale.time_to_pixel(50.0, 800).expect("wide");
        assert_eq!(narrow, 200.0);
        assert_eq!(wide, 400.0);
        assert_eq!(scale.visible_range(), (0.0, 100.0));
    }
}
