use serde::{Deserialize, Serialize};

use crate::core::{BarTone, ChartPoint, HistogramPoint, PaneRole, PriceScaleId};
use crate::error::ChartResult;
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{
    HistogramPalette, SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle,
};

/// Source of the bar heights of the volume histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramMode {
    /// Traded volume, toned by candle direction.
    #[default]
    Volume,
    /// `confidence * |sentiment|`, toned by sentiment sign.
    SentimentIntensity,
}

/// Histogram sample of one point, `None` when the point has nothing to show.
#[must_use]
pub fn histogram_point(point: &ChartPoint, mode: HistogramMode) -> Option<HistogramPoint> {
    match mode {
        HistogramMode::Volume => {
            let volume = point.volume.filter(|volume| *volume > 0.0)?;
            let tone = if point.is_bullish() {
                BarTone::Positive
            } else {
                BarTone::Negative
            };
            Some(HistogramPoint::new(point.time, volume, tone))
        }
        HistogramMode::SentimentIntensity => {
            let confidence = point.confidence.filter(|confidence| *confidence > 0.0)?;
            Some(HistogramPoint::new(
                point.time,
                confidence * point.sentiment.abs(),
                BarTone::of_sign(point.sentiment),
            ))
        }
    }
}

/// Bars along the bottom quarter of the price pane on their own scale.
#[derive(Debug)]
pub struct VolumeHistogramManager {
    binding: SeriesBinding,
    mode: HistogramMode,
}

impl Default for VolumeHistogramManager {
    fn default() -> Self {
        Self::new(HistogramMode::default())
    }
}

impl VolumeHistogramManager {
    pub const NAME: &'static str = "volume_histogram";

    #[must_use]
    pub const fn new(mode: HistogramMode) -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
            mode,
        }
    }

    #[must_use]
    pub fn mode(&self) -> HistogramMode {
        self.mode
    }
}

impl SeriesManager for VolumeHistogramManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::Histogram(HistogramPalette::Volume),
                PaneRole::Price,
                PriceScaleId::Histogram,
            ),
        )
    }

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        let bars = points
            .iter()
            .filter_map(|point| histogram_point(point, self.mode))
            .collect();
        self.binding.replace_data(SeriesData::Histogram(bars))
    }

    fn set_visible(&mut self, visible: bool) -> ChartResult<()> {
        self.binding.set_visible(visible)
    }

    fn destroy(&mut self) {
        self.binding.detach();
    }

    fn series_id(&self) -> Option<SeriesId> {
        self.binding.series_id()
    }

    fn is_visible(&self) -> Option<bool> {
        self.binding.is_visible()
    }
}
