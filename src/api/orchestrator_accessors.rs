use crate::api::config::ChartEngineConfig;
use crate::api::json_contract::CrosshairSnapshotJsonContractV1;
use crate::api::orchestrator::ChartOrchestrator;
use crate::api::toggles::ToggleState;
use crate::coordinators::CrosshairUpdate;
use crate::core::{ChartEvent, ChartPattern, ChartPoint, Timeframe};
use crate::error::ChartResult;
use crate::render::Renderer;
use crate::series::{MomentumStats, SeriesManager, momentum_stats};
use crate::surface::{SeriesId, SurfaceHandle, SurfaceStats};

/// Series handles of a mounted engine, `None` for managers not initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeriesHandles {
    pub price: Option<SeriesId>,
    pub sentiment: Option<SeriesId>,
    pub confidence: Option<SeriesId>,
    pub histogram: Option<SeriesId>,
    pub momentum: Option<SeriesId>,
    pub patterns: Option<SeriesId>,
    pub markers: Option<SeriesId>,
}

impl<R: Renderer> ChartOrchestrator<R> {
    #[must_use]
    pub fn config(&self) -> &ChartEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn toggles(&self) -> ToggleState {
        self.toggles
    }

    #[must_use]
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Badge text such as `BTC · 1d`.
    #[must_use]
    pub fn asset_label(&self) -> String {
        format!("{} · {}", self.config.asset, self.timeframe)
    }

    #[must_use]
    pub fn data(&self) -> &[ChartPoint] {
        &self.data
    }

    #[must_use]
    pub fn events(&self) -> &[ChartEvent] {
        &self.events
    }

    #[must_use]
    pub fn patterns(&self) -> &[ChartPattern] {
        &self.pattern_list
    }

    /// Last published crosshair reading; `None` while idle.
    #[must_use]
    pub fn crosshair_snapshot(&self) -> CrosshairUpdate {
        self.crosshair.current()
    }

    pub fn crosshair_snapshot_json_contract_v1_pretty(&self) -> ChartResult<String> {
        CrosshairSnapshotJsonContractV1::new(self.crosshair.current()).to_json_pretty()
    }

    #[must_use]
    pub fn momentum_stats(&self) -> MomentumStats {
        momentum_stats(&self.data)
    }

    /// Events dropped on the last marker rebuild for lack of a matching sample.
    #[must_use]
    pub fn skipped_events(&self) -> usize {
        self.markers.skipped_events()
    }

    /// Surface of the current or last mount; kept after `dispose`.
    #[must_use]
    pub fn surface(&self) -> Option<&SurfaceHandle> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn surface_stats(&self) -> Option<SurfaceStats> {
        self.surface.as_ref().map(SurfaceHandle::stats)
    }

    #[must_use]
    pub fn series_handles(&self) -> SeriesHandles {
        SeriesHandles {
            price: self.price.series_id(),
            sentiment: self.sentiment.series_id(),
            confidence: self.confidence.series_id(),
            histogram: self.histogram.series_id(),
            momentum: self.momentum.series_id(),
            patterns: self.patterns.series_id(),
            markers: self.markers.series_id(),
        }
    }

    #[must_use]
    pub fn is_crosshair_bound(&self) -> bool {
        self.crosshair.is_bound()
    }

    #[must_use]
    pub fn is_resize_connected(&self) -> bool {
        self.resize.is_connected()
    }

    /// Container widths applied to the surface and skipped, in that order.
    #[must_use]
    pub fn resize_counts(&self) -> (usize, usize) {
        (self.resize.applied_count(), self.resize.skipped_count())
    }
}
