use tracing::{debug, warn};

use crate::api::orchestrator::ChartOrchestrator;
use crate::core::{ChartEvent, ChartPattern, ChartPoint, is_strictly_ascending};
use crate::error::ChartResult;
use crate::render::Renderer;
use crate::series::SeriesManager;
use crate::surface::SurfaceHandle;

impl<R: Renderer> ChartOrchestrator<R> {
    /// Replaces the dataset of every series and fits the time scale once.
    ///
    /// Unsorted or duplicate times are rendered as given. Before `init` the
    /// dataset is stored and pushed on mount.
    pub fn set_data(&mut self, points: Vec<ChartPoint>) -> ChartResult<()> {
        if !is_strictly_ascending(&points) {
            warn!(
                count = points.len(),
                "dataset times are not strictly ascending, rendering as given"
            );
        }
        let malformed = points.iter().filter(|point| !point.is_well_formed()).count();
        if malformed > 0 {
            debug!(malformed, "points outside documented bounds");
        }
        self.data = points;

        let Some(surface) = self.surface.clone().filter(|_| self.is_mounted()) else {
            debug!(count = self.data.len(), "dataset stored until mount");
            return Ok(());
        };
        self.push_data(&surface)
    }

    pub(super) fn push_data(&mut self, surface: &SurfaceHandle) -> ChartResult<()> {
        self.price.set_data(&self.data)?;
        self.sentiment.set_data(&self.data)?;
        self.confidence.set_data(&self.data)?;
        self.histogram.set_data(&self.data)?;
        self.momentum.set_data(&self.data)?;
        self.patterns.set_data(&self.data)?;
        self.markers.set_data(&self.data)?;
        self.crosshair.set_dataset(&self.data);
        surface.borrow_mut().clear_crosshair();
        let fitted = surface.fit_content()?;
        debug!(count = self.data.len(), fitted, "dataset propagated");
        Ok(())
    }

    /// Replaces the event list and re-anchors markers on the current samples.
    ///
    /// Does not refit the time scale.
    pub fn set_events(&mut self, events: Vec<ChartEvent>) -> ChartResult<()> {
        self.events = events;
        if !self.is_mounted() {
            return Ok(());
        }
        self.markers.set_events(self.events.clone())?;
        debug!(
            events = self.events.len(),
            skipped = self.markers.skipped_events(),
            "events replaced"
        );
        Ok(())
    }

    pub fn set_patterns(&mut self, patterns: Vec<ChartPattern>) -> ChartResult<()> {
        self.pattern_list = patterns;
        if !self.is_mounted() {
            return Ok(());
        }
        self.patterns.set_patterns(self.pattern_list.clone())?;
        debug!(patterns = self.pattern_list.len(), "patterns replaced");
        Ok(())
    }
}
