use tracing::warn;

use crate::core::{BandPoint, ChartPoint, PaneRole, PriceScaleId};
use crate::error::{ChartError, ChartResult};
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle};

/// Band half-width at zero confidence, in sentiment units.
pub const DEFAULT_CONFIDENCE_SPREAD: f64 = 0.5;

/// Band around the sentiment value of one point.
///
/// Explicit `sentiment_lower`/`sentiment_upper` win when both are finite.
/// Otherwise the half-width is `(1 - confidence) * spread`, clamped to
/// `[0, spread]`. Without either, the band collapses onto the sentiment value.
#[must_use]
pub fn band_for_point(point: &ChartPoint, spread: f64) -> BandPoint {
    if let (Some(upper), Some(lower)) = (point.sentiment_upper, point.sentiment_lower) {
        if upper.is_finite() && lower.is_finite() {
            return BandPoint::new(point.time, upper, lower);
        }
    }

    let half_width = match point.confidence {
        Some(confidence) if confidence.is_finite() => {
            ((1.0 - confidence) * spread).clamp(0.0, spread)
        }
        _ => 0.0,
    };
    BandPoint::new(
        point.time,
        point.sentiment + half_width,
        point.sentiment - half_width,
    )
}

/// Shaded confidence region on the sentiment scale.
#[derive(Debug)]
pub struct ConfidenceBandManager {
    binding: SeriesBinding,
    spread: f64,
}

impl Default for ConfidenceBandManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceBandManager {
    pub const NAME: &'static str = "confidence_band";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
            spread: DEFAULT_CONFIDENCE_SPREAD,
        }
    }

    pub fn with_spread(mut self, spread: f64) -> ChartResult<Self> {
        if !spread.is_finite() || spread <= 0.0 {
            return Err(ChartError::InvalidData(
                "confidence band spread must be finite and > 0".to_owned(),
            ));
        }
        self.spread = spread;
        Ok(self)
    }

    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }
}

impl SeriesManager for ConfidenceBandManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::ConfidenceBand,
                PaneRole::Price,
                PriceScaleId::Sentiment,
            ),
        )
    }

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        let band: Vec<BandPoint> = points
            .iter()
            .map(|point| band_for_point(point, self.spread))
            .collect();
        let collapsed = band.iter().filter(|point| point.is_zero_width()).count();
        if collapsed > 0 && collapsed == band.len() {
            warn!(
                manager = Self::NAME,
                count = collapsed,
                "no confidence data, band collapsed"
            );
        }
        self.binding.replace_data(SeriesData::Band(band))
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
