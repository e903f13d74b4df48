use tracing::warn;

use crate::core::{ChartPattern, ChartPoint, PaneRole, PriceScaleId};
use crate::error::{ChartResult, LifecycleError};
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle};

/// Translucent boxes marking detected patterns on the price pane.
///
/// Box heights come from the host candles at render time, so `set_data`
/// only checks the lifecycle; patterns arrive through `set_patterns`.
#[derive(Debug)]
pub struct PatternOverlayManager {
    binding: SeriesBinding,
    host: Option<SeriesId>,
}

impl Default for PatternOverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternOverlayManager {
    pub const NAME: &'static str = "pattern_overlay";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
            host: None,
        }
    }

    pub fn attach_to_price(&mut self, price_series: SeriesId) {
        self.host = Some(price_series);
    }

    pub fn set_patterns(&mut self, patterns: Vec<ChartPattern>) -> ChartResult<()> {
        self.binding.replace_data(SeriesData::Boxes(patterns))
    }
}

impl SeriesManager for PatternOverlayManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        let Some(host) = self.host else {
            let err = LifecycleError::PriceSeriesRequired {
                component: Self::NAME,
            };
            warn!(manager = Self::NAME, error = %err, "series manager misuse");
            return Err(err.into());
        };
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::PatternBoxes { host },
                PaneRole::Price,
                PriceScaleId::Right,
            ),
        )
    }

    fn set_data(&mut self, _points: &[ChartPoint]) -> ChartResult<()> {
        self.binding.active().map(|_| ())
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
