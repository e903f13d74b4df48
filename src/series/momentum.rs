use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BarTone, ChartPoint, HistogramPoint, PaneRole, PriceScaleId};
use crate::error::{ChartError, ChartResult};
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{
    HistogramPalette, SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle,
};

pub const DEFAULT_MOMENTUM_PANE_STRETCH: f64 = 0.25;

/// Summary of the momentum values in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentumStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Min, max and mean of the finite momentum values; zeros when there are none.
#[must_use]
pub fn momentum_stats(points: &[ChartPoint]) -> MomentumStats {
    let mut count = 0_usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in points
        .iter()
        .filter_map(|point| point.momentum)
        .filter(|value| value.is_finite())
    {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }
    if count == 0 {
        return MomentumStats::default();
    }
    MomentumStats {
        min,
        max,
        avg: sum / count as f64,
    }
}

/// Diverging momentum histogram in its own pane below the price pane.
///
/// Owns the momentum pane: it is created on `initialize` and released on
/// `destroy`.
#[derive(Debug)]
pub struct MomentumPanelManager {
    binding: SeriesBinding,
    stretch_factor: f64,
}

impl Default for MomentumPanelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentumPanelManager {
    pub const NAME: &'static str = "momentum_panel";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
            stretch_factor: DEFAULT_MOMENTUM_PANE_STRETCH,
        }
    }

    pub fn with_pane_stretch(mut self, stretch_factor: f64) -> ChartResult<Self> {
        if !stretch_factor.is_finite() || stretch_factor <= 0.0 {
            return Err(ChartError::InvalidData(
                "momentum pane stretch factor must be finite and > 0".to_owned(),
            ));
        }
        self.stretch_factor = stretch_factor;
        Ok(self)
    }

    #[must_use]
    pub fn pane_stretch(&self) -> f64 {
        self.stretch_factor
    }
}

impl SeriesManager for MomentumPanelManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        if self.binding.series_id().is_none() {
            surface
                .borrow_mut()
                .ensure_pane(PaneRole::Momentum, self.stretch_factor)?;
        }
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::Histogram(HistogramPalette::Momentum),
                PaneRole::Momentum,
                PriceScaleId::Momentum,
            ),
        )
    }

    /// Points without a momentum value are left out of the histogram.
    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        let bars = points
            .iter()
            .filter_map(|point| {
                point
                    .momentum
                    .map(|value| HistogramPoint::new(point.time, value, BarTone::of_sign(value)))
            })
            .collect();
        self.binding.replace_data(SeriesData::Histogram(bars))
    }

    fn set_visible(&mut self, visible: bool) -> ChartResult<()> {
        self.binding.set_visible(visible)
    }

    fn destroy(&mut self) {
        let Some(handle) = self.binding.detach() else {
            return;
        };
        let mut surface = handle.borrow_mut();
        if surface.is_removed() {
            return;
        }
        match surface.release_pane(PaneRole::Momentum) {
            Ok(released) => debug!(manager = Self::NAME, released, "momentum pane released"),
            Err(err) => debug!(manager = Self::NAME, error = %err, "momentum pane release skipped"),
        }
    }

    fn series_id(&self) -> Option<SeriesId> {
        self.binding.series_id()
    }

    fn is_visible(&self) -> Option<bool> {
        self.binding.is_visible()
    }
}
