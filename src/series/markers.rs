use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::core::{ChartEvent, ChartPoint, EventCategory, EventSeverity, PaneRole, PriceScaleId};
use crate::error::{ChartResult, LifecycleError};
use crate::extensions::{MarkerPosition, MarkerShape, SeriesMarker};
use crate::render::ChartStyle;
use crate::series::SeriesManager;
use crate::series::binding::SeriesBinding;
use crate::surface::{SeriesData, SeriesId, SeriesKind, SeriesOptions, SurfaceHandle};

/// What happens when several events share one sample time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTiePolicy {
    /// Every event gets a marker above the bar; lane allocation keeps them apart.
    #[default]
    RenderAll,
    /// Only the last event given for that time is drawn.
    LatestWins,
    /// The first event sits above the bar, the rest below it.
    Stack,
}

/// Markers built for one event list plus how many events had no sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkerBuild {
    pub markers: Vec<SeriesMarker>,
    pub skipped: usize,
}

/// Turns events into markers anchored on `sample_times`.
///
/// Events whose time matches no sample are counted in `skipped` and dropped.
#[must_use]
pub fn build_series_markers(
    events: &[ChartEvent],
    sample_times: &IndexSet<OrderedFloat<f64>>,
    policy: EventTiePolicy,
    style: &ChartStyle,
) -> MarkerBuild {
    let mut by_time: IndexMap<OrderedFloat<f64>, SmallVec<[&ChartEvent; 2]>> = IndexMap::new();
    let mut skipped = 0;
    for event in events {
        let key = OrderedFloat(event.time);
        if sample_times.contains(&key) {
            by_time.entry(key).or_default().push(event);
        } else {
            skipped += 1;
        }
    }

    let mut markers = Vec::with_capacity(events.len() - skipped);
    for group in by_time.values() {
        match policy {
            EventTiePolicy::RenderAll => markers.extend(
                group
                    .iter()
                    .map(|event| marker_for(event, MarkerPosition::AboveBar, style)),
            ),
            EventTiePolicy::LatestWins => markers.extend(
                group
                    .last()
                    .map(|event| marker_for(event, MarkerPosition::AboveBar, style)),
            ),
            EventTiePolicy::Stack => {
                markers.extend(group.iter().enumerate().map(|(index, event)| {
                    let position = if index == 0 {
                        MarkerPosition::AboveBar
                    } else {
                        MarkerPosition::BelowBar
                    };
                    marker_for(event, position, style)
                }));
            }
        }
    }

    MarkerBuild { markers, skipped }
}

fn marker_for(event: &ChartEvent, position: MarkerPosition, style: &ChartStyle) -> SeriesMarker {
    let shape = match event.category {
        EventCategory::Earnings | EventCategory::Macro => MarkerShape::Square,
        EventCategory::Product => MarkerShape::ArrowUp,
        EventCategory::News | EventCategory::Custom => MarkerShape::Circle,
    };
    let priority = match event.severity {
        EventSeverity::Low => 0,
        EventSeverity::Medium => 1,
        EventSeverity::High => 2,
    };
    SeriesMarker::new(
        event.id.clone(),
        event.time,
        position,
        style.event_marker_color(event.category, event.severity),
    )
    .with_shape(shape)
    .with_text(event.badge_text())
    .with_priority(priority)
}

/// Event markers attached to the price series.
///
/// Needs the price series handle through [`EventMarkersManager::attach_to_price`]
/// before `initialize`. Events and sample times are kept separately so either
/// can change without the other.
#[derive(Debug)]
pub struct EventMarkersManager {
    binding: SeriesBinding,
    host: Option<SeriesId>,
    tie_policy: EventTiePolicy,
    style: ChartStyle,
    events: Vec<ChartEvent>,
    sample_times: IndexSet<OrderedFloat<f64>>,
    skipped: usize,
}

impl Default for EventMarkersManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventMarkersManager {
    pub const NAME: &'static str = "event_markers";

    #[must_use]
    pub fn new() -> Self {
        Self {
            binding: SeriesBinding::new(Self::NAME),
            host: None,
            tie_policy: EventTiePolicy::default(),
            style: ChartStyle::default(),
            events: Vec::new(),
            sample_times: IndexSet::new(),
            skipped: 0,
        }
    }

    #[must_use]
    pub fn with_tie_policy(mut self, policy: EventTiePolicy) -> Self {
        self.tie_policy = policy;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Records the price series handle markers anchor on.
    pub fn attach_to_price(&mut self, price_series: SeriesId) {
        self.host = Some(price_series);
    }

    #[must_use]
    pub fn tie_policy(&self) -> EventTiePolicy {
        self.tie_policy
    }

    #[must_use]
    pub fn events(&self) -> &[ChartEvent] {
        &self.events
    }

    /// Events dropped by the last rebuild because no sample matched their time.
    #[must_use]
    pub fn skipped_events(&self) -> usize {
        self.skipped
    }

    /// Replaces the event list and re-attaches markers to the current samples.
    pub fn set_events(&mut self, events: Vec<ChartEvent>) -> ChartResult<()> {
        self.binding.active()?;
        self.events = events;
        self.rebuild()
    }

    fn rebuild(&mut self) -> ChartResult<()> {
        let build = build_series_markers(
            &self.events,
            &self.sample_times,
            self.tie_policy,
            &self.style,
        );
        if build.skipped > 0 {
            debug!(
                manager = Self::NAME,
                skipped = build.skipped,
                "events without matching sample skipped"
            );
        }
        self.skipped = build.skipped;
        self.binding.replace_data(SeriesData::Markers(build.markers))
    }
}

impl SeriesManager for EventMarkersManager {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, surface: &SurfaceHandle) -> ChartResult<SeriesId> {
        let Some(host) = self.host else {
            let err = LifecycleError::PriceSeriesRequired {
                component: Self::NAME,
            };
            warn!(manager = Self::NAME, error = %err, "series manager misuse");
            return Err(err.into());
        };
        self.binding.attach(
            surface,
            SeriesOptions::new(
                SeriesKind::Markers { host },
                PaneRole::Price,
                PriceScaleId::Right,
            ),
        )
    }

    fn set_data(&mut self, points: &[ChartPoint]) -> ChartResult<()> {
        self.binding.active()?;
        self.sample_times = points.iter().map(|point| OrderedFloat(point.time)).collect();
        self.rebuild()
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
