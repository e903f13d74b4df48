use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::coordinators::listeners::ListenerRegistry;
use crate::core::ChartPoint;
use crate::error::ChartResult;
use crate::surface::{CrosshairMoveEvent, PointerPosition, SubscriptionId, SurfaceHandle};

/// Normalized crosshair reading published to listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairSnapshot {
    pub time: f64,
    /// Close of the matched sample.
    pub price: f64,
    pub sentiment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerPosition>,
    /// The matched sample, for tooltips that show more than price and sentiment.
    pub point: ChartPoint,
}

impl CrosshairSnapshot {
    #[must_use]
    pub fn from_point(point: &ChartPoint, pointer: Option<PointerPosition>) -> Self {
        Self {
            time: point.time,
            price: point.close,
            sentiment: point.sentiment,
            pointer,
            point: point.clone(),
        }
    }
}

/// `None` means the crosshair is idle.
pub type CrosshairUpdate = Option<CrosshairSnapshot>;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CrosshairPhase {
    #[default]
    Idle,
    Active(CrosshairSnapshot),
}

#[derive(Debug)]
struct CrosshairState {
    index: IndexMap<OrderedFloat<f64>, usize>,
    points: Rc<[ChartPoint]>,
    phase: CrosshairPhase,
    enabled: bool,
}

impl Default for CrosshairState {
    fn default() -> Self {
        Self {
            index: IndexMap::new(),
            points: Rc::from(Vec::new()),
            phase: CrosshairPhase::Idle,
            enabled: true,
        }
    }
}

impl CrosshairState {
    fn resolve(&mut self, event: &CrosshairMoveEvent) -> CrosshairUpdate {
        let snapshot = match event.time {
            Some(time) if self.enabled => self
                .index
                .get(&OrderedFloat(time))
                .and_then(|position| self.points.get(*position))
                .map(|point| CrosshairSnapshot::from_point(point, event.pointer)),
            _ => None,
        };
        self.phase = match &snapshot {
            Some(snapshot) => CrosshairPhase::Active(snapshot.clone()),
            None => CrosshairPhase::Idle,
        };
        snapshot
    }
}

type SharedListeners = Rc<RefCell<ListenerRegistry<CrosshairUpdate>>>;

/// Turns surface crosshair moves into snapshots of the current dataset.
///
/// Lookup is an exact match on the time the surface snapped to. Duplicate
/// times resolve to the last sample given. A miss or a pointer leave publishes
/// `None` and returns to idle.
#[derive(Debug)]
pub struct CrosshairCoordinator {
    state: Rc<RefCell<CrosshairState>>,
    listeners: SharedListeners,
    subscription: Option<(SurfaceHandle, SubscriptionId)>,
}

impl CrosshairCoordinator {
    #[must_use]
    pub fn new(listeners: SharedListeners) -> Self {
        Self {
            state: Rc::new(RefCell::new(CrosshairState::default())),
            listeners,
            subscription: None,
        }
    }

    /// Subscribes to `surface`; a second bind to the same surface is a no-op.
    pub fn bind(&mut self, surface: &SurfaceHandle) -> ChartResult<()> {
        if let Some((bound, _)) = &self.subscription {
            if bound.ptr_eq(surface) {
                trace!("crosshair coordinator already bound");
                return Ok(());
            }
            self.unbind();
        }

        let state = Rc::clone(&self.state);
        let listeners = Rc::clone(&self.listeners);
        let id = surface.subscribe_crosshair_move(move |event| {
            publish(&state, &listeners, event);
        })?;
        self.subscription = Some((surface.clone(), id));
        debug!(subscription = id.raw(), "crosshair coordinator bound");
        Ok(())
    }

    /// Drops the surface subscription. Safe to call repeatedly.
    pub fn unbind(&mut self) {
        let Some((surface, id)) = self.subscription.take() else {
            return;
        };
        let removed = surface.unsubscribe_crosshair_move(id);
        self.state.borrow_mut().phase = CrosshairPhase::Idle;
        debug!(removed, "crosshair coordinator unbound");
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replaces the dataset lookups run against and returns to idle.
    pub fn set_dataset(&self, points: &[ChartPoint]) {
        let mut state = self.state.borrow_mut();
        state.index = points
            .iter()
            .enumerate()
            .map(|(position, point)| (OrderedFloat(point.time), position))
            .collect();
        state.points = Rc::from(points);
        state.phase = CrosshairPhase::Idle;
        debug!(
            count = points.len(),
            unique_times = state.index.len(),
            "crosshair dataset replaced"
        );
    }

    /// Disabling publishes `None` once and keeps every later update `None`.
    pub fn set_enabled(&self, enabled: bool) {
        let was_active = {
            let mut state = self.state.borrow_mut();
            if state.enabled == enabled {
                return;
            }
            state.enabled = enabled;
            let was_active = matches!(state.phase, CrosshairPhase::Active(_));
            if !enabled {
                state.phase = CrosshairPhase::Idle;
            }
            was_active
        };
        debug!(enabled, "crosshair enabled changed");
        if !enabled && was_active {
            emit(&self.listeners, &None);
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    /// Processes one event as if the surface had delivered it.
    pub fn handle_event(&self, event: &CrosshairMoveEvent) {
        publish(&self.state, &self.listeners, event);
    }

    /// Sample at exactly `time`, if any.
    #[must_use]
    pub fn lookup(&self, time: f64) -> Option<ChartPoint> {
        let state = self.state.borrow();
        state
            .index
            .get(&OrderedFloat(time))
            .and_then(|position| state.points.get(*position))
            .cloned()
    }

    #[must_use]
    pub fn phase(&self) -> CrosshairPhase {
        self.state.borrow().phase.clone()
    }

    #[must_use]
    pub fn current(&self) -> CrosshairUpdate {
        match &self.state.borrow().phase {
            CrosshairPhase::Active(snapshot) => Some(snapshot.clone()),
            CrosshairPhase::Idle => None,
        }
    }
}

impl Drop for CrosshairCoordinator {
    fn drop(&mut self) {
        self.unbind();
    }
}

fn publish(
    state: &Rc<RefCell<CrosshairState>>,
    listeners: &SharedListeners,
    event: &CrosshairMoveEvent,
) {
    let update = state.borrow_mut().resolve(event);
    trace!(time = ?event.time, hit = update.is_some(), "crosshair resolved");
    emit(listeners, &update);
}

fn emit(listeners: &SharedListeners, update: &CrosshairUpdate) {
    let snapshot = listeners.borrow().snapshot();
    for listener in &snapshot {
        listener(update);
    }
}
