use crate::core::{PaneLayoutRegion, PriceScale, TimeScale};
use crate::error::ChartResult;

/// Coordinate system of one (pane, price scale) pair on the shared time axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotContext {
    pub time_scale: TimeScale,
    pub price_scale: PriceScale,
    pub width: u32,
    pub region: PaneLayoutRegion,
}

impl PlotContext {
    pub fn x(&self, time: f64) -> ChartResult<f64> {
        self.time_scale.time_to_pixel(time, self.width)
    }

    pub fn y(&self, value: f64) -> ChartResult<f64> {
        self.price_scale.value_to_y(value, self.region)
    }

    /// Maps `(time, value)` to pixels, `None` for non-finite input.
    #[must_use]
    pub fn project(&self, time: f64, value: f64) -> Option<(f64, f64)> {
        Some((self.x(time).ok()?, self.y(value).ok()?))
    }

    /// Bar width in pixels for samples `spacing` seconds apart.
    #[must_use]
    pub fn bar_width(&self, spacing: f64, fill_ratio: f64, min_px: f64) -> f64 {
        self.time_scale
            .span_to_pixels(spacing, self.width)
            .map(|px| (px * fill_ratio).max(min_px))
            .unwrap_or(min_px)
    }
}

/// Smallest positive gap between consecutive times, if any.
#[must_use]
pub fn min_time_spacing(times: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut previous: Option<f64> = None;
    let mut best: Option<f64> = None;
    for time in times.into_iter().filter(|time| time.is_finite()) {
        if let Some(prev) = previous {
            let gap = (time - prev).abs();
            if gap > 0.0 && best.is_none_or(|current| gap < current) {
                best = Some(gap);
            }
        }
        previous = Some(time);
    }
    best
}
