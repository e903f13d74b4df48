//! Series managers: one per overlay kind, sharing one lifecycle contract.

mod binding;
pub mod confidence;
pub mod histogram;
pub mod markers;
pub mod momentum;
pub mod patterns;
pub mod price;
pub mod sentiment;

use crate::core::ChartPoint;
use crate::error::ChartResult;
use crate::surface::{SeriesId, SurfaceHandle};

pub use confidence::{ConfidenceBandManager, DEFAULT_CONFIDENCE_SPREAD, band_for_point};
pub use histogram::{HistogramMode, VolumeHistogramManager, histogram_point};
pub use markers::{EventMarkersManager, EventTiePolicy, MarkerBuild, build_series_markers};
pub use momentum::{
    DEFAULT_MOMENTUM_PANE_STRETCH, MomentumPanelManager, MomentumStats, momentum_stats,
};
pub use patterns::PatternOverlayManager;
pub use price::PriceSeriesManager;
pub use sentiment::SentimentOverlayManager;

/// Uniform lifecycle of one overlay.
///
/// `initialize` twice without `destroy` is an error, `set_data` replaces the
/// whole payload, hidden series keep their data, and `destroy` never fails.
pub trait SeriesManager {
    /// Stable component name used in logs and lifecycle errors.
    fn name(&self) -> &'static str;

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId>;

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()>;

    fn set_visible(&mut self, visible: bool) -> ChartResult<()>;

    fn destroy(&mut self);

    fn series_id(&self) -> Option<SeriesId>;

    /// `None` unless initialized.
    fn is_visible(&self) -> Option<bool>;

    fn is_initialized(&self) -> bool {
        self.series_id().is_some()
    }
}
