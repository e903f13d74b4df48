use tracing::{debug, warn};

use crate::api::orchestrator::{ChartOrchestrator, MountPhase};
use crate::api::toggles::OverlayKind;
use crate::coordinators::{ContainerSize, ResizeObserver};
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult, LifecycleError};
use crate::render::Renderer;
use crate::series::SeriesManager;
use crate::surface::{SurfaceHandle, SurfaceOptions};

impl<R: Renderer> ChartOrchestrator<R> {
    /// Mounts the engine into a container of size `container`.
    ///
    /// Creates the surface, initializes the price series, then the overlays
    /// with event markers last, then binds the crosshair and resize
    /// coordinators. The container height is ignored; the configured height
    /// is used. On failure everything built so far is disposed.
    pub fn init(
        &mut self,
        container: ContainerSize,
        observer: Box<dyn ResizeObserver>,
    ) -> ChartResult<()> {
        if self.phase == MountPhase::Mounted {
            let err = LifecycleError::AlreadyMounted;
            warn!(error = %err, "orchestrator misuse");
            return Err(err.into());
        }

        match self.mount(container, observer) {
            Ok(()) => {
                self.phase = MountPhase::Mounted;
                debug!(
                    asset = %self.config.asset,
                    points = self.data.len(),
                    events = self.events.len(),
                    "orchestrator mounted"
                );
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "orchestrator init failed, disposing partial mount");
                self.dispose();
                Err(err)
            }
        }
    }

    fn mount(
        &mut self,
        container: ContainerSize,
        observer: Box<dyn ResizeObserver>,
    ) -> ChartResult<()> {
        let width = container_width_px(container.width)?;
        let options = SurfaceOptions::new(Viewport::new(width, self.config.height))
            .with_style(self.config.style)
            .with_time_scale_tuning(self.config.time_scale_tuning);
        let surface = SurfaceHandle::create(options)?;
        self.surface = Some(surface.clone());

        let price_series = self.price.initialize(&surface)?;
        self.sentiment.initialize(&surface)?;
        self.confidence.initialize(&surface)?;
        self.histogram.initialize(&surface)?;
        self.momentum.initialize(&surface)?;
        self.patterns.attach_to_price(price_series);
        self.patterns.initialize(&surface)?;
        self.markers.attach_to_price(price_series);
        self.markers.initialize(&surface)?;

        for kind in OverlayKind::ALL {
            self.apply_visibility(kind, self.toggles.get(kind))?;
        }

        self.crosshair.bind(&surface)?;
        self.resize.connect(&surface, observer)?;

        self.push_data(&surface)?;
        if !self.events.is_empty() {
            self.markers.set_events(self.events.clone())?;
        }
        if !self.pattern_list.is_empty() {
            self.patterns.set_patterns(self.pattern_list.clone())?;
        }
        Ok(())
    }

    /// Tears the engine down: coordinators first, then every manager, then
    /// the surface. Safe to call repeatedly and after a failed `init`.
    pub fn dispose(&mut self) {
        if self.phase != MountPhase::Mounted && self.surface.is_none() {
            debug!("dispose skipped: nothing mounted");
            return;
        }

        self.crosshair.unbind();
        self.resize.disconnect();

        self.markers.destroy();
        self.patterns.destroy();
        self.momentum.destroy();
        self.histogram.destroy();
        self.confidence.destroy();
        self.sentiment.destroy();
        self.price.destroy();

        if let Some(surface) = &self.surface {
            surface.remove();
        }
        if self.phase != MountPhase::Disposed {
            debug!(asset = %self.config.asset, "orchestrator disposed");
        }
        self.phase = MountPhase::Disposed;
    }

    #[must_use]
    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.phase == MountPhase::Mounted
    }
}

fn container_width_px(width: f64) -> ChartResult<u32> {
    if !width.is_finite() || width.round() < 1.0 {
        return Err(ChartError::InvalidViewport {
            width: 0,
            height: 0,
        });
    }
    Ok(width.round().min(f64::from(u32::MAX)) as u32)
}
