use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{OhlcBar, PlotContext};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Which end of the candle an event badge hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerPosition {
    AboveBar,
    BelowBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    ArrowUp,
}

/// Badge anchored on the candle whose time equals `time`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesMarker {
    pub id: String,
    pub time: f64,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub color: Color,
    pub text: Option<String>,
    /// Higher wins the inner lane when badges collide.
    pub priority: i32,
}

impl SeriesMarker {
    #[must_use]
    pub fn new(id: impl Into<String>, time: f64, position: MarkerPosition, color: Color) -> Self {
        Self {
            id: id.into(),
            time,
            position,
            shape: MarkerShape::default(),
            color,
            text: None,
            priority: 0,
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Pixel metrics of event badges and their labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerLayout {
    pub marker_size_px: f64,
    pub label_char_width_px: f64,
    pub label_height_px: f64,
    pub label_padding_px: f64,
    /// Space between badge and label, and between stacked lanes.
    pub gap_px: f64,
    /// Distance from the candle wick to the first lane.
    pub anchor_offset_px: f64,
}

impl Default for MarkerLayout {
    fn default() -> Self {
        Self {
            marker_size_px: 10.0,
            label_char_width_px: 7.0,
            label_height_px: 14.0,
            label_padding_px: 4.0,
            gap_px: 3.0,
            anchor_offset_px: 6.0,
        }
    }
}

impl MarkerLayout {
    pub fn validate(self) -> ChartResult<Self> {
        let metrics = [
            ("marker_size_px", self.marker_size_px),
            ("label_char_width_px", self.label_char_width_px),
            ("label_height_px", self.label_height_px),
            ("label_padding_px", self.label_padding_px),
            ("gap_px", self.gap_px),
            ("anchor_offset_px", self.anchor_offset_px),
        ];
        if let Some((name, _)) = metrics
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(ChartError::InvalidData(format!(
                "marker layout `{name}` must be finite and > 0"
            )));
        }
        Ok(self)
    }

    fn lane_height(self) -> f64 {
        self.marker_size_px + self.gap_px + self.label_height_px + self.gap_px
    }

    fn label_width(self, text: &str) -> f64 {
        text.chars().count() as f64 * self.label_char_width_px + 2.0 * self.label_padding_px
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLabel {
    pub text: String,
    pub center_x: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Badge resolved to pixels on a concrete candle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: String,
    pub time: f64,
    /// Candle high for badges above the bar, low for badges below.
    pub anchor_price: f64,
    pub position: MarkerPosition,
    pub shape: MarkerShape,
    pub color: Color,
    pub lane: usize,
    pub x: f64,
    pub y: f64,
    pub label: Option<MarkerLabel>,
    /// Horizontal extent used for lane collision checks.
    pub extent: (f64, f64),
}

/// Places badges on the candles sharing their time, stacking collisions
/// into outer lanes.
///
/// Badges without a candle are dropped. Within a side, badges are laid out
/// left to right; ties go to higher priority, then id.
pub fn place_markers(
    markers: &[SeriesMarker],
    candles: &[OhlcBar],
    plot: &PlotContext,
    layout: MarkerLayout,
) -> ChartResult<Vec<PlacedMarker>> {
    let layout = layout.validate()?;
    if markers.is_empty() || candles.is_empty() {
        return Ok(Vec::new());
    }

    let candles: IndexMap<OrderedFloat<f64>, OhlcBar> = candles
        .iter()
        .filter(|bar| bar.is_finite())
        .map(|bar| (OrderedFloat(bar.time), *bar))
        .collect();
    let width = f64::from(plot.width);

    let mut anchored: Vec<(f64, f64, &SeriesMarker)> = markers
        .iter()
        .filter_map(|marker| {
            let bar = candles.get(&OrderedFloat(marker.time))?;
            let x = plot.x(marker.time).ok()?;
            let (low, high) = bar.envelope();
            let anchor = match marker.position {
                MarkerPosition::AboveBar => high,
                MarkerPosition::BelowBar => low,
            };
            Some((x, anchor, marker))
        })
        .collect();
    anchored.sort_by(|(ax, _, a), (bx, _, b)| {
        OrderedFloat(*ax)
            .cmp(&OrderedFloat(*bx))
            .then_with(|| b.priority.cmp(&a.priority))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut lanes = LaneAllocator::default();
    let mut placed = Vec::with_capacity(anchored.len());
    for (raw_x, anchor_price, marker) in anchored {
        let label_text = marker.text.as_deref().filter(|text| !text.is_empty());
        let half_extent = 0.5
            * label_text
                .map(|text| layout.label_width(text))
                .unwrap_or(0.0)
                .max(layout.marker_size_px);
        let x = if width <= 2.0 * half_extent {
            width / 2.0
        } else {
            raw_x.clamp(half_extent, width - half_extent)
        };
        let extent = (x - half_extent, x + half_extent);
        let lane = lanes.claim(marker.position, extent, layout.gap_px);

        let wick_y = plot.y(anchor_price)?;
        let offset = layout.anchor_offset_px + lane as f64 * layout.lane_height();
        let y = match marker.position {
            MarkerPosition::AboveBar => wick_y - offset,
            MarkerPosition::BelowBar => wick_y + offset,
        };
        let label = label_text.map(|text| {
            let half_badge = layout.marker_size_px / 2.0;
            let top = match marker.position {
                MarkerPosition::AboveBar => {
                    y - half_badge - layout.gap_px - layout.label_height_px
                }
                MarkerPosition::BelowBar => y + half_badge + layout.gap_px,
            };
            MarkerLabel {
                text: text.to_owned(),
                center_x: x,
                top,
                width: layout.label_width(text),
                height: layout.label_height_px,
            }
        });

        placed.push(PlacedMarker {
            id: marker.id.clone(),
            time: marker.time,
            anchor_price,
            position: marker.position,
            shape: marker.shape,
            color: marker.color,
            lane,
            x,
            y,
            label,
            extent,
        });
    }
    Ok(placed)
}

/// Right edge of the last badge in each lane, per side of the candle.
#[derive(Debug, Default)]
struct LaneAllocator {
    above: Vec<f64>,
    below: Vec<f64>,
}

impl LaneAllocator {
    fn claim(&mut self, position: MarkerPosition, (left, right): (f64, f64), gap: f64) -> usize {
        let lanes = match position {
            MarkerPosition::AboveBar => &mut self.above,
            MarkerPosition::BelowBar => &mut self.below,
        };
        match lanes.iter().position(|edge| left >= edge + gap) {
            Some(lane) => {
                lanes[lane] = right;
                lane
            }
            None => {
                lanes.push(right);
                lanes.len() - 1
            }
        }
    }
}
