use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::api::config::ChartEngineConfig;
use crate::api::toggles::{ToggleChange, ToggleState};
use crate::coordinators::{
    CrosshairCoordinator, CrosshairUpdate, ListenerChannel, ListenerRegistry, ResizeCoordinator,
};
use crate::core::{ChartEvent, ChartPattern, ChartPoint, Timeframe};
use crate::error::{ChartResult, LifecycleError};
use crate::render::{RenderFrame, Renderer};
use crate::series::{
    ConfidenceBandManager, EventMarkersManager, MomentumPanelManager, PatternOverlayManager,
    PriceSeriesManager, SentimentOverlayManager, VolumeHistogramManager,
};
use crate::surface::SurfaceHandle;

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Where the orchestrator is in its mount cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPhase {
    #[default]
    Unmounted,
    Mounted,
    /// Torn down; `init` may mount again on a fresh surface.
    Disposed,
}

/// Root of the engine: owns the surface, every series manager and both
/// coordinators, and fixes the order they are wired and torn down in.
///
/// Data, events, patterns and toggles given before `init` are kept and
/// applied when the surface mounts.
pub struct ChartOrchestrator<R: Renderer> {
    pub(super) config: ChartEngineConfig,
    pub(super) renderer: R,
    pub(super) phase: MountPhase,
    pub(super) surface: Option<SurfaceHandle>,

    pub(super) price: PriceSeriesManager,
    pub(super) sentiment: SentimentOverlayManager,
    pub(super) confidence: ConfidenceBandManager,
    pub(super) histogram: VolumeHistogramManager,
    pub(super) momentum: MomentumPanelManager,
    pub(super) patterns: PatternOverlayManager,
    pub(super) markers: EventMarkersManager,

    pub(super) crosshair: CrosshairCoordinator,
    pub(super) resize: ResizeCoordinator,

    pub(super) toggles: ToggleState,
    pub(super) timeframe: Timeframe,
    pub(super) data: Vec<ChartPoint>,
    pub(super) events: Vec<ChartEvent>,
    pub(super) pattern_list: Vec<ChartPattern>,

    pub(super) crosshair_listeners: Rc<RefCell<ListenerRegistry<CrosshairUpdate>>>,
    pub(super) toggle_listeners: ListenerRegistry<ToggleChange>,
    pub(super) timeframe_listeners: ListenerRegistry<Timeframe>,
}

impl<R: Renderer> ChartOrchestrator<R> {
    /// Builds an unmounted engine. Nothing touches a surface until `init`.
    pub fn new(config: ChartEngineConfig, renderer: R) -> ChartResult<Self> {
        config.validate()?;
        let crosshair_listeners = Rc::new(RefCell::new(ListenerRegistry::new(
            ListenerChannel::Crosshair,
        )));

        debug!(asset = %config.asset, interval = %config.interval, "orchestrator created");
        Ok(Self {
            price: PriceSeriesManager::new(),
            sentiment: SentimentOverlayManager::new(),
            confidence: ConfidenceBandManager::new().with_spread(config.confidence_band_spread)?,
            histogram: VolumeHistogramManager::new(config.histogram_mode),
            momentum: MomentumPanelManager::new().with_pane_stretch(config.momentum_pane_stretch)?,
            patterns: PatternOverlayManager::new(),
            markers: EventMarkersManager::new()
                .with_tie_policy(config.event_tie_policy)
                .with_style(config.style),
            crosshair: CrosshairCoordinator::new(Rc::clone(&crosshair_listeners)),
            resize: ResizeCoordinator::new(),
            toggles: config.toggles,
            timeframe: config.interval,
            data: Vec::new(),
            events: Vec::new(),
            pattern_list: Vec::new(),
            crosshair_listeners,
            toggle_listeners: ListenerRegistry::new(ListenerChannel::Toggle),
            timeframe_listeners: ListenerRegistry::new(ListenerChannel::Timeframe),
            phase: MountPhase::Unmounted,
            surface: None,
            renderer,
            config,
        })
    }

    /// Materializes the current surface state without drawing it.
    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        self.mounted_surface()?.borrow().build_render_frame()
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    /// Renders into an external cairo context, e.g. from a GTK draw callback.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_render_frame()?;
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Disposes the engine and hands back its renderer.
    #[must_use]
    pub fn into_renderer(mut self) -> R {
        self.dispose();
        self.renderer
    }

    pub(super) fn mounted_surface(&self) -> ChartResult<&SurfaceHandle> {
        match (&self.surface, self.phase) {
            (Some(surface), MountPhase::Mounted) => Ok(surface),
            _ => Err(LifecycleError::NotMounted.into()),
        }
    }
}
