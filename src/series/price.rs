use crate::core::{ChartPoint, OhlcBar};
use crate::error::ChartResult;
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{SeriesData, SeriesId, SeriesOptions, SurfaceHandle};

/// Candlestick series on the price pane.
///
/// Its handle is the anchor markers and pattern boxes attach to, so it must
/// be initialized before either of them.
#[derive(Debug)]
pub struct PriceSeriesManager {
    binding: SeriesBinding,
}

impl Default for PriceSeriesManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSeriesManager {
    pub const NAME: &'static str = "price_series";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
        }
    }
}

impl SeriesManager for PriceSeriesManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        self.binding.attach(surface, SeriesOptions::candlestick())
    }

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        let bars = points.iter().map(OhlcBar::from_point).collect();
        self.binding.replace_data(SeriesData::Candles(bars))
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
