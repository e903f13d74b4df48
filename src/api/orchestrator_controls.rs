use tracing::{debug, info, trace};

use crate::api::orchestrator::ChartOrchestrator;
use crate::api::toggles::{OverlayKind, ToggleChange};
use crate::api::toolbar::{ToolbarAction, ZOOM_IN_INSET_RATIO, ZOOM_OUT_INSET_RATIO};
use crate::coordinators::{CrosshairUpdate, ListenerChannel, ListenerId};
use crate::core::Timeframe;
use crate::error::ChartResult;
use crate::render::Renderer;
use crate::series::SeriesManager;

impl<R: Renderer> ChartOrchestrator<R> {
    /// Shows or hides one overlay.
    ///
    /// Only the manager behind `kind` is touched; no data is re-sent and the
    /// time scale is not refitted. Listeners hear about actual changes only.
    pub fn set_overlay_visible(&mut self, kind: OverlayKind, visible: bool) -> ChartResult<()> {
        if self.toggles.get(kind) == visible {
            trace!(overlay = %kind, visible, "toggle unchanged");
            return Ok(());
        }
        if self.is_mounted() {
            self.apply_visibility(kind, visible)?;
        }
        self.toggles.set(kind, visible);
        debug!(overlay = %kind, visible, "toggle changed");
        self.toggle_listeners.emit(&ToggleChange { kind, visible });
        Ok(())
    }

    pub fn toggle_overlay(&mut self, kind: OverlayKind) -> ChartResult<()> {
        self.set_overlay_visible(kind, !self.toggles.get(kind))
    }

    pub(super) fn apply_visibility(&mut self, kind: OverlayKind, visible: bool) -> ChartResult<()> {
        match kind {
            OverlayKind::Sentiment => self.sentiment.set_visible(visible),
            OverlayKind::ConfidenceBand => self.confidence.set_visible(visible),
            OverlayKind::Events => self.markers.set_visible(visible),
            OverlayKind::Momentum => self.momentum.set_visible(visible),
            OverlayKind::Histogram => self.histogram.set_visible(visible),
            OverlayKind::Patterns => self.patterns.set_visible(visible),
            OverlayKind::Crosshair => {
                self.crosshair.set_enabled(visible);
                if !visible {
                    if let Some(surface) = &self.surface {
                        surface.borrow_mut().clear_crosshair();
                    }
                }
                Ok(())
            }
        }
    }

    /// Switches the displayed timeframe and notifies timeframe listeners.
    ///
    /// Reloading data for the new interval is the host's job.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        if self.timeframe == timeframe {
            return;
        }
        self.timeframe = timeframe;
        debug!(timeframe = %timeframe, "timeframe changed");
        self.timeframe_listeners.emit(&timeframe);
    }

    pub fn handle_toolbar_action(&mut self, action: ToolbarAction) -> ChartResult<()> {
        trace!(?action, "toolbar action");
        match action {
            ToolbarAction::SetTimeframe(timeframe) => {
                self.set_timeframe(timeframe);
                Ok(())
            }
            ToolbarAction::Toggle(kind) => self.toggle_overlay(kind),
            ToolbarAction::AutoFit => self.mounted_surface()?.fit_content().map(|_| ()),
            ToolbarAction::ZoomIn => self
                .mounted_surface()?
                .borrow_mut()
                .zoom_visible_range(ZOOM_IN_INSET_RATIO),
            ToolbarAction::ZoomOut => self
                .mounted_surface()?
                .borrow_mut()
                .zoom_visible_range(ZOOM_OUT_INSET_RATIO),
            ToolbarAction::Compare => {
                info!("compare is not supported, action ignored");
                Ok(())
            }
        }
    }

    /// Forwards host pointer motion to the surface and returns the resulting snapshot.
    ///
    /// With the crosshair toggled off the move is dropped and nothing is drawn.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> ChartResult<CrosshairUpdate> {
        let surface = self.mounted_surface()?;
        if !self.crosshair.is_enabled() {
            trace!(x, y, "crosshair disabled, pointer move dropped");
            return Ok(None);
        }
        surface.pointer_move(x, y)?;
        Ok(self.crosshair.current())
    }

    pub fn pointer_leave(&mut self) -> ChartResult<()> {
        self.mounted_surface()?.pointer_leave()
    }

    pub fn on_crosshair_change(
        &mut self,
        listener: impl Fn(&CrosshairUpdate) + 'static,
    ) -> ListenerId {
        self.crosshair_listeners.borrow_mut().add(listener)
    }

    pub fn on_toggle_change(&mut self, listener: impl Fn(&ToggleChange) + 'static) -> ListenerId {
        self.toggle_listeners.add(listener)
    }

    pub fn on_timeframe_change(&mut self, listener: impl Fn(&Timeframe) + 'static) -> ListenerId {
        self.timeframe_listeners.add(listener)
    }

    /// Returns `true` when the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        match id.channel() {
            ListenerChannel::Crosshair => self.crosshair_listeners.borrow_mut().remove(id),
            ListenerChannel::Toggle => self.toggle_listeners.remove(id),
            ListenerChannel::Timeframe => self.timeframe_listeners.remove(id),
        }
    }
}
