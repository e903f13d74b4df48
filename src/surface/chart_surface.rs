use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{PaneCollection, PaneId, PaneRole, TimeScale, Viewport};
use crate::error::{ChartError, ChartResult, LifecycleError};
use crate::render::ChartStyle;
use crate::surface::series::{SeriesData, SeriesId, SeriesKind, SeriesOptions, SeriesSlot};
use crate::surface::{SurfaceOptions, SurfaceOptionsPatch};

/// Pointer location in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Crosshair move reported by the surface.
///
/// `time` is already snapped to a sample time; `None` means the pointer left
/// the plot area or there is nothing to snap to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairMoveEvent {
    pub time: Option<f64>,
    pub pointer: Option<PointerPosition>,
}

impl CrosshairMoveEvent {
    #[must_use]
    pub const fn at(time: f64, pointer: PointerPosition) -> Self {
        Self {
            time: Some(time),
            pointer: Some(pointer),
        }
    }

    #[must_use]
    pub const fn left() -> Self {
        Self {
            time: None,
            pointer: None,
        }
    }
}

pub type CrosshairMoveHandler = Rc<dyn Fn(&CrosshairMoveEvent)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Side-effect counters, so hosts and tests can observe what the surface did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurfaceStats {
    pub set_data_calls: usize,
    pub fit_content_calls: usize,
    pub apply_options_calls: usize,
    pub visibility_changes: usize,
    pub series_added: usize,
    pub series_removed: usize,
    pub removals: usize,
}

/// Rendering surface shared by every series of one chart.
///
/// Owns the time axis, the pane layout, the series store and the crosshair
/// subscriptions. After [`ChartSurface::remove`] every operation fails with
/// [`LifecycleError::SurfaceRemoved`].
pub struct ChartSurface {
    options: SurfaceOptions,
    time_scale: TimeScale,
    panes: PaneCollection,
    series: IndexMap<SeriesId, SeriesSlot>,
    next_series_id: u32,
    handlers: IndexMap<SubscriptionId, CrosshairMoveHandler>,
    next_subscription_id: u64,
    crosshair: Option<PointerPosition>,
    stats: SurfaceStats,
    removed: bool,
}

impl fmt::Debug for ChartSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSurface")
            .field("viewport", &self.options.viewport)
            .field("time_scale", &self.time_scale)
            .field("series", &self.series.len())
            .field("handlers", &self.handlers.len())
            .field("removed", &self.removed)
            .finish()
    }
}

impl ChartSurface {
    pub fn create(options: SurfaceOptions) -> ChartResult<Self> {
        let options = options.validate()?;
        debug!(
            width = options.viewport.width,
            height = options.viewport.height,
            "chart surface created"
        );
        Ok(Self {
            options,
            time_scale: TimeScale::new(0.0, 1.0)?,
            panes: PaneCollection::default(),
            series: IndexMap::new(),
            next_series_id: 1,
            handlers: IndexMap::new(),
            next_subscription_id: 1,
            crosshair: None,
            stats: SurfaceStats::default(),
            removed: false,
        })
    }

    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.options
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.options.viewport
    }

    #[must_use]
    pub fn style(&self) -> &ChartStyle {
        &self.options.style
    }

    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn apply_options(&mut self, patch: SurfaceOptionsPatch) -> ChartResult<()> {
        self.ensure_alive()?;
        self.options = patch.apply_to(self.options)?;
        self.stats.apply_options_calls += 1;
        trace!(
            width = self.options.viewport.width,
            height = self.options.viewport.height,
            "surface options applied"
        );
        Ok(())
    }

    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        self.time_scale
    }

    /// Fits the visible range to every sample time on the surface.
    ///
    /// Returns `Ok(false)` when there is no sample to fit; the window is kept.
    pub fn fit_content(&mut self) -> ChartResult<bool> {
        self.ensure_alive()?;
        self.stats.fit_content_calls += 1;
        let times: Vec<f64> = self
            .series
            .values()
            .flat_map(|slot| slot.data.times())
            .collect();
        let fitted = self
            .time_scale
            .fit_to_times(times, self.options.time_scale_tuning)?;
        debug!(fitted, "fit content");
        Ok(fitted)
    }

    pub fn set_visible_range(&mut self, start: f64, end: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        self.time_scale.set_visible_range(start, end)
    }

    /// Moves both visible edges inward by `ratio` of the span (outward if negative).
    pub fn zoom_visible_range(&mut self, ratio: f64) -> ChartResult<()> {
        self.ensure_alive()?;
        self.time_scale.inset_visible_range(ratio)
    }

    #[must_use]
    pub fn panes(&self) -> &PaneCollection {
        &self.panes
    }

    pub fn ensure_pane(&mut self, role: PaneRole, stretch_factor: f64) -> ChartResult<PaneId> {
        self.ensure_alive()?;
        self.panes.ensure_pane(role, stretch_factor)
    }

    /// Removes the pane for `role` once no series uses it.
    pub fn release_pane(&mut self, role: PaneRole) -> ChartResult<bool> {
        self.ensure_alive()?;
        if role == PaneRole::Price || self.series.values().any(|slot| slot.options.pane == role) {
            return Ok(false);
        }
        self.panes.release(role)
    }

    pub fn add_series(&mut self, options: SeriesOptions) -> ChartResult<SeriesId> {
        self.ensure_alive()?;
        if let Some(host) = options.kind.host() {
            let host_is_candles = self
                .series
                .get(&host)
                .is_some_and(|slot| slot.options.kind == SeriesKind::Candlestick);
            if !host_is_candles {
                return Err(LifecycleError::PriceSeriesRequired {
                    component: "surface",
                }
                .into());
            }
        }
        if self.panes.pane_for_role(options.pane).is_none() {
            return Err(ChartError::InvalidData(format!(
                "pane {:?} does not exist on this surface",
                options.pane
            )));
        }

        let id = SeriesId::new(self.next_series_id);
        self.next_series_id = self.next_series_id.saturating_add(1);
        self.series.insert(
            id,
            SeriesSlot {
                data: options.kind.empty_data(),
                options,
            },
        );
        self.stats.series_added += 1;
        debug!(series = id.raw(), kind = ?options.kind, "series added");
        Ok(id)
    }

    /// Removes a series and every series attached to it.
    pub fn remove_series(&mut self, id: SeriesId) -> ChartResult<bool> {
        self.ensure_alive()?;
        if self.series.shift_remove(&id).is_none() {
            return Ok(false);
        }
        self.stats.series_removed += 1;
        let attached: Vec<SeriesId> = self
            .series
            .iter()
            .filter(|(_, slot)| slot.options.kind.host() == Some(id))
            .map(|(attached_id, _)| *attached_id)
            .collect();
        for attached_id in attached {
            self.series.shift_remove(&attached_id);
            self.stats.series_removed += 1;
        }
        debug!(series = id.raw(), "series removed");
        Ok(true)
    }

    /// Replaces the full payload of a series.
    pub fn set_series_data(&mut self, id: SeriesId, data: SeriesData) -> ChartResult<()> {
        self.ensure_alive()?;
        let slot = self
            .series
            .get_mut(&id)
            .ok_or(LifecycleError::UnknownSeries { raw: id.raw() })?;
        if !slot.options.kind.accepts(&data) {
            return Err(ChartError::InvalidData(format!(
                "series {} of kind {:?} cannot take this payload",
                id.raw(),
                slot.options.kind
            )));
        }
        let count = data.len();
        slot.data = data;
        self.stats.set_data_calls += 1;
        trace!(series = id.raw(), count, "series data replaced");
        Ok(())
    }

    /// Shows or hides a series. Its data is kept either way.
    pub fn set_series_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<()> {
        self.ensure_alive()?;
        let slot = self
            .series
            .get_mut(&id)
            .ok_or(LifecycleError::UnknownSeries { raw: id.raw() })?;
        if slot.options.visible != visible {
            slot.options.visible = visible;
            self.stats.visibility_changes += 1;
        }
        Ok(())
    }

    #[must_use]
    pub fn series_data(&self, id: SeriesId) -> Option<&SeriesData> {
        self.series.get(&id).map(|slot| &slot.data)
    }

    #[must_use]
    pub fn series_options(&self, id: SeriesId) -> Option<SeriesOptions> {
        self.series.get(&id).map(|slot| slot.options)
    }

    #[must_use]
    pub fn is_series_visible(&self, id: SeriesId) -> Option<bool> {
        self.series.get(&id).map(|slot| slot.options.visible)
    }

    #[must_use]
    pub fn contains_series(&self, id: SeriesId) -> bool {
        self.series.contains_key(&id)
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Sorted, de-duplicated times the crosshair snaps to.
    ///
    /// Candle times when a candlestick series exists, otherwise every sample time.
    #[must_use]
    pub fn anchor_times(&self) -> Vec<f64> {
        let has_candles = self
            .series
            .values()
            .any(|slot| slot.options.kind == SeriesKind::Candlestick);
        let mut times: Vec<f64> = self
            .series
            .values()
            .filter(|slot| !has_candles || slot.options.kind == SeriesKind::Candlestick)
            .flat_map(|slot| slot.data.times())
            .filter(|time| time.is_finite())
            .collect();
        times.sort_by_key(|time| OrderedFloat(*time));
        times.dedup();
        times
    }

    /// Resolves a raw pointer position into a snapped crosshair event.
    pub fn resolve_pointer(&mut self, x: f64, y: f64) -> ChartResult<CrosshairMoveEvent> {
        self.ensure_alive()?;
        let viewport = self.options.viewport;
        let inside = x.is_finite()
            && y.is_finite()
            && (0.0..=f64::from(viewport.width)).contains(&x)
            && (0.0..=f64::from(viewport.height)).contains(&y);
        if !inside {
            self.crosshair = None;
            return Ok(CrosshairMoveEvent::left());
        }

        let pointer_time = self.time_scale.pixel_to_time(x, viewport.width)?;
        let Some(time) = nearest_time(&self.anchor_times(), pointer_time) else {
            self.crosshair = None;
            return Ok(CrosshairMoveEvent::left());
        };
        let snapped_x = self.time_scale.time_to_pixel(time, viewport.width)?;
        let pointer = PointerPosition { x: snapped_x, y };
        self.crosshair = Some(pointer);
        Ok(CrosshairMoveEvent::at(time, pointer))
    }

    pub fn clear_crosshair(&mut self) {
        self.crosshair = None;
    }

    #[must_use]
    pub fn crosshair_position(&self) -> Option<PointerPosition> {
        self.crosshair
    }

    pub fn subscribe_crosshair_move(
        &mut self,
        handler: CrosshairMoveHandler,
    ) -> ChartResult<SubscriptionId> {
        self.ensure_alive()?;
        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id = self.next_subscription_id.saturating_add(1);
        self.handlers.insert(id, handler);
        debug!(subscription = id.raw(), "crosshair handler subscribed");
        Ok(id)
    }

    /// Returns `false` when the subscription was already gone.
    pub fn unsubscribe_crosshair_move(&mut self, id: SubscriptionId) -> bool {
        let removed = self.handlers.shift_remove(&id).is_some();
        if removed {
            debug!(subscription = id.raw(), "crosshair handler unsubscribed");
        }
        removed
    }

    #[must_use]
    pub fn crosshair_subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub(crate) fn crosshair_handlers(&self) -> Vec<CrosshairMoveHandler> {
        self.handlers.values().cloned().collect()
    }

    /// Drops every series and subscription. Safe to call repeatedly.
    pub fn remove(&mut self) {
        if self.removed {
            trace!("chart surface already removed");
            return;
        }
        self.removed = true;
        self.handlers.clear();
        self.series.clear();
        self.crosshair = None;
        self.stats.removals += 1;
        debug!("chart surface removed");
    }

    pub(crate) fn ensure_alive(&self) -> ChartResult<()> {
        if self.removed {
            return Err(LifecycleError::SurfaceRemoved.into());
        }
        Ok(())
    }

    pub(crate) fn series_slots(&self) -> impl Iterator<Item = (&SeriesId, &SeriesSlot)> {
        self.series.iter()
    }

    pub(crate) fn slot(&self, id: SeriesId) -> Option<&SeriesSlot> {
        self.series.get(&id)
    }
}

fn nearest_time(sorted: &[f64], target: f64) -> Option<f64> {
    if sorted.is_empty() || !target.is_finite() {
        return None;
    }
    let index = sorted.partition_point(|time| *time < target);
    let after = sorted.get(index).copied();
    let before = index.checked_sub(1).and_then(|i| sorted.get(i)).copied();
    match (before, after) {
        (Some(b), Some(a)) => Some(if target - b <= a - target { b } else { a }),
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Shared handle to a [`ChartSurface`].
///
/// Managers and coordinators each hold a clone. Crosshair dispatch copies the
/// handler list before invoking it, so handlers may call back into the surface.
#[derive(Clone)]
pub struct SurfaceHandle {
    inner: Rc<RefCell<ChartSurface>>,
}

impl fmt::Debug for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(surface) => surface.fmt(f),
            Err(_) => f.write_str("SurfaceHandle(<borrowed>)"),
        }
    }
}

impl SurfaceHandle {
    pub fn create(options: SurfaceOptions) -> ChartResult<Self> {
        Ok(Self {
            inner: Rc::new(RefCell::new(ChartSurface::create(options)?)),
        })
    }

    #[must_use]
    pub fn borrow(&self) -> Ref<'_, ChartSurface> {
        self.inner.borrow()
    }

    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, ChartSurface> {
        self.inner.borrow_mut()
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakSurfaceHandle {
        WeakSurfaceHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    #[must_use]
    pub fn ptr_eq(&self, other: &SurfaceHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.inner.borrow().stats()
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        self.inner.borrow().is_removed()
    }

    pub fn apply_options(&self, patch: SurfaceOptionsPatch) -> ChartResult<()> {
        self.inner.borrow_mut().apply_options(patch)
    }

    pub fn fit_content(&self) -> ChartResult<bool> {
        self.inner.borrow_mut().fit_content()
    }

    pub fn subscribe_crosshair_move(
        &self,
        handler: impl Fn(&CrosshairMoveEvent) + 'static,
    ) -> ChartResult<SubscriptionId> {
        self.inner
            .borrow_mut()
            .subscribe_crosshair_move(Rc::new(handler))
    }

    pub fn unsubscribe_crosshair_move(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().unsubscribe_crosshair_move(id)
    }

    /// Delivers `event` to every crosshair handler; returns how many ran.
    pub fn dispatch_crosshair_move(&self, event: CrosshairMoveEvent) -> ChartResult<usize> {
        let handlers = {
            let surface = self.inner.borrow();
            surface.ensure_alive()?;
            surface.crosshair_handlers()
        };
        for handler in &handlers {
            handler(&event);
        }
        Ok(handlers.len())
    }

    /// Host entry point for pointer motion over the surface.
    pub fn pointer_move(&self, x: f64, y: f64) -> ChartResult<CrosshairMoveEvent> {
        let event = self.inner.borrow_mut().resolve_pointer(x, y)?;
        trace!(x, y, time = ?event.time, "pointer move");
        self.dispatch_crosshair_move(event)?;
        Ok(event)
    }

    /// Host entry point for the pointer leaving the surface.
    pub fn pointer_leave(&self) -> ChartResult<()> {
        {
            let mut surface = self.inner.borrow_mut();
            surface.ensure_alive()?;
            surface.clear_crosshair();
        }
        self.dispatch_crosshair_move(CrosshairMoveEvent::left())?;
        Ok(())
    }

    /// Invalidates the surface and every series handle derived from it.
    pub fn remove(&self) {
        self.inner.borrow_mut().remove();
    }
}

/// Non-owning surface handle for observers that must not keep it alive.
#[derive(Debug, Clone)]
pub struct WeakSurfaceHandle {
    inner: Weak<RefCell<ChartSurface>>,
}

impl WeakSurfaceHandle {
    #[must_use]
    pub fn upgrade(&self) -> Option<SurfaceHandle> {
        self.inner.upgrade().map(|inner| SurfaceHandle { inner })
    }
}
