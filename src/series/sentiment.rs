use crate::core::{ChartPoint, LinePoint, PaneRole, PriceScaleId};
use crate::error::ChartResult;
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle};

/// Sentiment line on the fixed `[-1, 1]` overlay scale of the price pane.
///
/// Values outside the range are clamped by the scale when drawn; the stored
/// payload keeps them as given.
#[derive(Debug)]
pub struct SentimentOverlayManager {
    binding: SeriesBinding,
}

impl Default for SentimentOverlayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentOverlayManager {
    pub const NAME: &'static str = "sentiment_overlay";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
        }
    }
}

impl SeriesManager for SentimentOverlayManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::SentimentLine,
                PaneRole::Price,
                PriceScaleId::Sentiment,
            ),
        )
    }

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        let line = points
            .iter()
            .map(|point| LinePoint::new(point.time, point.sentiment))
            .collect();
        self.binding.replace_data(SeriesData::Line(line))
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

#[cfg(test)]
mod tests {
    use super::SentimentOverlayManager;
    use crate::core::{ChartPoint, LinePoint, Viewport};
    use crate::series::SeriesManager;
    use crate::surface::{SeriesData, SurfaceHandle, SurfaceOptions};

    #[test]
    fn out_of_range_sentiment_is_stored_unchanged() {
        let surface =
            SurfaceHandle::create(SurfaceOptions::new(Viewport::new(640, 320))).expect("surface");
        let mut manager = SentimentOverlayManager::new();
        let id = manager.initialize(&surface).expect("init");
        manager
            .set_data(&[
                ChartPoint::new(1.0, 10.0, 11.0, 9.0, 10.5, -0.4),
                ChartPoint::new(2.0, 10.5, 11.0, 10.0, 10.8, 1.6),
            ])
            .expect("set data");

        assert_eq!(
            surface.borrow().series_data(id),
            Some(&SeriesData::Line(vec![
                LinePoint::new(1.0, -0.4),
                LinePoint::new(2.0, 1.6),
            ]))
        );
    }

    #[test]
    fn hide_and_show_keeps_payload() {
        let surface =
            SurfaceHandle::create(SurfaceOptions::new(Viewport::new(640, 320))).expect("surface");
        let mut manager = SentimentOverlayManager::new();
        let id = manager.initialize(&surface).expect("init");
        manager
            .set_data(&[ChartPoint::new(1.0, 10.0, 11.0, 9.0, 10.5, 0.3)])
            .expect("set data");
        let before = surface.borrow().series_data(id).cloned();

        manager.set_visible(false).expect("hide");
        assert_eq!(manager.is_visible(), Some(false));
        manager.set_visible(true).expect("show");

        assert_eq!(surface.borrow().series_data(id).cloned(), before);
        assert_eq!(surface.stats().set_data_calls, 1);
    }
}
