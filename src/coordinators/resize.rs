use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ChartResult, LifecycleError};
use crate::surface::{SurfaceHandle, SurfaceOptionsPatch, WeakSurfaceHandle};

/// Box size of the mount container, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

pub type ResizeCallback = Box<dyn FnMut(ContainerSize)>;

/// Source of container size changes.
///
/// An observer is created for one container; `observe` starts delivering its
/// sizes to `callback` and `disconnect` stops it.
pub trait ResizeObserver {
    fn observe(&mut self, callback: ResizeCallback) -> ChartResult<()>;
    fn disconnect(&mut self);
}

#[derive(Default)]
struct ManualObserverState {
    callback: Option<ResizeCallback>,
    generation: u64,
    observe_calls: usize,
    disconnect_calls: usize,
}

/// Resize observer driven by hand, for hosts without a native one and for tests.
///
/// Clones share one state, so a host can keep a clone and call
/// [`ManualResizeObserver::notify`] after handing the other to the engine.
#[derive(Clone, Default)]
pub struct ManualResizeObserver {
    state: Rc<RefCell<ManualObserverState>>,
}

impl fmt::Debug for ManualResizeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualResizeObserver")
            .field("observing", &state.callback.is_some())
            .field("observe_calls", &state.observe_calls)
            .field("disconnect_calls", &state.disconnect_calls)
            .finish()
    }
}

impl ManualResizeObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `size` to the observing callback; `false` when disconnected.
    pub fn notify(&self, size: ContainerSize) -> bool {
        let (mut callback, generation) = {
            let mut state = self.state.borrow_mut();
            let Some(callback) = state.callback.take() else {
                return false;
            };
            (callback, state.generation)
        };
        callback(size);
        // Put the callback back unless it was replaced or disconnected meanwhile.
        let mut state = self.state.borrow_mut();
        if state.generation == generation {
            state.callback = Some(callback);
        }
        true
    }

    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.state.borrow().callback.is_some()
    }

    #[must_use]
    pub fn observe_calls(&self) -> usize {
        self.state.borrow().observe_calls
    }

    #[must_use]
    pub fn disconnect_calls(&self) -> usize {
        self.state.borrow().disconnect_calls
    }
}

impl ResizeObserver for ManualResizeObserver {
    fn observe(&mut self, callback: ResizeCallback) -> ChartResult<()> {
        let mut state = self.state.borrow_mut();
        state.callback = Some(callback);
        state.generation += 1;
        state.observe_calls += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        let mut state = self.state.borrow_mut();
        state.callback = None;
        state.generation += 1;
        state.disconnect_calls += 1;
    }
}

#[derive(Debug, Default)]
struct ResizeCounters {
    applied: Cell<usize>,
    skipped: Cell<usize>,
}

/// Keeps the surface width in step with its container.
///
/// Only the width follows the container; the height is fixed at mount.
/// Resizing never refits the time scale, so the visible window survives.
/// Non-positive or non-finite widths are skipped.
pub struct ResizeCoordinator {
    observer: Option<Box<dyn ResizeObserver>>,
    counters: Rc<ResizeCounters>,
}

impl fmt::Debug for ResizeCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizeCoordinator")
            .field("connected", &self.observer.is_some())
            .field("counters", &self.counters)
            .finish()
    }
}

impl Default for ResizeCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeCoordinator {
    pub const NAME: &'static str = "resize_coordinator";

    #[must_use]
    pub fn new() -> Self {
        Self {
            observer: None,
            counters: Rc::new(ResizeCounters::default()),
        }
    }

    pub fn connect(
        &mut self,
        surface: &SurfaceHandle,
        mut observer: Box<dyn ResizeObserver>,
    ) -> ChartResult<()> {
        if self.observer.is_some() {
            let err = LifecycleError::AlreadyInitialized {
                component: Self::NAME,
            };
            warn!(error = %err, "resize coordinator misuse");
            return Err(err.into());
        }

        let surface = surface.downgrade();
        let counters = Rc::clone(&self.counters);
        observer.observe(Box::new(move |size| {
            apply_width(&surface, size, &counters);
        }))?;
        self.observer = Some(observer);
        debug!("resize coordinator connected");
        Ok(())
    }

    /// Stops observing. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer.disconnect();
            debug!(
                applied = self.counters.applied.get(),
                skipped = self.counters.skipped.get(),
                "resize coordinator disconnected"
            );
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.observer.is_some()
    }

    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.counters.applied.get()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.counters.skipped.get()
    }
}

impl Drop for ResizeCoordinator {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn apply_width(surface: &WeakSurfaceHandle, size: ContainerSize, counters: &ResizeCounters) {
    let skip = |reason: &'static str| {
        counters.skipped.set(counters.skipped.get() + 1);
        reason
    };

    if !size.width.is_finite() || size.width.round() < 1.0 {
        let reason = skip("container width is not a positive size");
        warn!(width = size.width, reason, "resize skipped");
        return;
    }
    let Some(surface) = surface.upgrade().filter(|surface| !surface.is_removed()) else {
        let reason = skip("surface is gone");
        trace!(width = size.width, reason, "resize skipped");
        return;
    };

    let width = size.width.round().min(f64::from(u32::MAX)) as u32;
    match surface.apply_options(SurfaceOptionsPatch::width(width)) {
        Ok(()) => {
            counters.applied.set(counters.applied.get() + 1);
            trace!(width, "surface width applied");
        }
        Err(err) => {
            let reason = skip("surface rejected width");
            warn!(width, error = %err, reason, "resize skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerSize, ManualResizeObserver, ResizeCoordinator};
    use crate::core::Viewport;
    use crate::surface::{SurfaceHandle, SurfaceOptions};

    fn surface() -> SurfaceHandle {
        SurfaceHandle::create(SurfaceOptions::new(Viewport::new(800, 600))).expect("surface")
    }

    #[test]
    fn width_follows_container_and_height_stays() {
        let surface = surface();
        let observer = ManualResizeObserver::new();
        let mut coordinator = ResizeCoordinator::new();
        coordinator
            .connect(&surface, Box::new(observer.clone()))
            .expect("connect");

        assert!(observer.notify(ContainerSize::new(1023.6, 10.0)));
        assert_eq!(surface.borrow().viewport(), Viewport::new(1024, 600));
        assert_eq!(coordinator.applied_count(), 1);
        assert_eq!(surface.stats().fit_content_calls, 0);
    }

    #[test]
    fn collapsed_container_is_skipped() {
        let surface = surface();
        let observer = ManualResizeObserver::new();
        let mut coordinator = ResizeCoordinator::new();
        coordinator
            .connect(&surface, Box::new(observer.clone()))
            .expect("connect");

        observer.notify(ContainerSize::new(0.0, 0.0));
        observer.notify(ContainerSize::new(-5.0, 100.0));
        observer.notify(ContainerSize::new(f64::NAN, 100.0));
        assert_eq!(coordinator.skipped_count(), 3);
        assert_eq!(surface.stats().apply_options_calls, 0);
        assert_eq!(surface.borrow().viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn disconnect_is_idempotent_and_stops_delivery() {
        let surface = surface();
        let observer = ManualResizeObserver::new();
        let mut coordinator = ResizeCoordinator::new();
        coordinator
            .connect(&surface, Box::new(observer.clone()))
            .expect("connect");
        coordinator.disconnect();
        coordinator.disconnect();

        assert!(!observer.is_observing());
        assert_eq!(observer.disconnect_calls(), 1);
        assert!(!observer.notify(ContainerSize::new(500.0, 500.0)));
    }

    #[test]
    fn second_connect_is_rejected() {
        let surface = surface();
        let mut coordinator = ResizeCoordinator::new();
        coordinator
            .connect(&surface, Box::new(ManualResizeObserver::new()))
            .expect("connect");
        assert!(
            coordinator
                .connect(&surface, Box::new(ManualResizeObserver::new()))
                .is_err()
        );
    }
}
