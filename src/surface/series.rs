use serde::{Deserialize, Serialize};

use crate::core::{
    BandPoint, ChartPattern, HistogramPoint, LinePoint, OhlcBar, PaneRole, PriceScaleId,
};
use crate::extensions::SeriesMarker;

/// Handle of one series living on a surface.
///
/// Handles are never reused within a surface, so a stale handle can only
/// miss, never alias another series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(u32);

impl SeriesId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistogramPalette {
    /// Diverging colours by sign plus a zero line.
    Momentum,
    /// Up/down colours by candle direction or sentiment sign.
    Volume,
}

/// What a series draws. Markers and boxes are attached to a host candlestick
/// series and anchor on its candles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Candlestick,
    SentimentLine,
    ConfidenceBand,
    Histogram(HistogramPalette),
    Markers { host: SeriesId },
    PatternBoxes { host: SeriesId },
}

impl SeriesKind {
    #[must_use]
    pub fn host(self) -> Option<SeriesId> {
        match self {
            SeriesKind::Markers { host } | SeriesKind::PatternBoxes { host } => Some(host),
            _ => None,
        }
    }

    #[must_use]
    pub fn accepts(self, data: &SeriesData) -> bool {
        matches!(
            (self, data),
            (SeriesKind::Candlestick, SeriesData::Candles(_))
                | (SeriesKind::SentimentLine, SeriesData::Line(_))
                | (SeriesKind::ConfidenceBand, SeriesData::Band(_))
                | (SeriesKind::Histogram(_), SeriesData::Histogram(_))
                | (SeriesKind::Markers { .. }, SeriesData::Markers(_))
                | (SeriesKind::PatternBoxes { .. }, SeriesData::Boxes(_))
        )
    }

    #[must_use]
    pub fn empty_data(self) -> SeriesData {
        match self {
            SeriesKind::Candlestick => SeriesData::Candles(Vec::new()),
            SeriesKind::SentimentLine => SeriesData::Line(Vec::new()),
            SeriesKind::ConfidenceBand => SeriesData::Band(Vec::new()),
            SeriesKind::Histogram(_) => SeriesData::Histogram(Vec::new()),
            SeriesKind::Markers { .. } => SeriesData::Markers(Vec::new()),
            SeriesKind::PatternBoxes { .. } => SeriesData::Boxes(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesOptions {
    pub kind: SeriesKind,
    pub pane: PaneRole,
    pub price_scale: PriceScaleId,
    pub visible: bool,
}

impl SeriesOptions {
    #[must_use]
    pub fn new(kind: SeriesKind, pane: PaneRole, price_scale: PriceScaleId) -> Self {
        Self {
            kind,
            pane,
            price_scale,
            visible: true,
        }
    }

    #[must_use]
    pub fn candlestick() -> Self {
        Self::new(SeriesKind::Candlestick, PaneRole::Price, PriceScaleId::Right)
    }
}

/// Full payload of one series; `set_series_data` replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    Candles(Vec<OhlcBar>),
    Line(Vec<LinePoint>),
    Band(Vec<BandPoint>),
    Histogram(Vec<HistogramPoint>),
    Markers(Vec<SeriesMarker>),
    Boxes(Vec<ChartPattern>),
}

impl SeriesData {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Candles(items) => items.len(),
            SeriesData::Line(items) => items.len(),
            SeriesData::Band(items) => items.len(),
            SeriesData::Histogram(items) => items.len(),
            SeriesData::Markers(items) => items.len(),
            SeriesData::Boxes(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample times on the shared axis. Attached series contribute none.
    pub fn times(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            SeriesData::Candles(items) => Box::new(items.iter().map(|bar| bar.time)),
            SeriesData::Line(items) => Box::new(items.iter().map(|point| point.time)),
            SeriesData::Band(items) => Box::new(items.iter().map(|point| point.time)),
            SeriesData::Histogram(items) => Box::new(items.iter().map(|point| point.time)),
            SeriesData::Markers(_) | SeriesData::Boxes(_) => Box::new(std::iter::empty()),
        }
    }

    /// Values a price scale autoscales on.
    pub fn scale_values(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            SeriesData::Candles(items) => Box::new(items.iter().flat_map(|bar| {
                let (low, high) = bar.envelope();
                [low, high]
            })),
            SeriesData::Line(items) => Box::new(items.iter().map(|point| point.value)),
            SeriesData::Band(items) => {
                Box::new(items.iter().flat_map(|point| [point.lower, point.upper]))
            }
            SeriesData::Histogram(items) => Box::new(items.iter().map(|point| point.value)),
            SeriesData::Markers(_) | SeriesData::Boxes(_) => Box::new(std::iter::empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SeriesSlot {
    pub(crate) options: SeriesOptions,
    pub(crate) data: SeriesData,
}

#[cfg(test)]
mod tests {
    use super::{HistogramPalette, SeriesData, SeriesId, SeriesKind};
    use crate::core::{LinePoint, OhlcBar};

    #[test]
    fn kind_accepts_only_matching_payload() {
        let line = SeriesData::Line(vec![LinePoint::new(1.0, 0.2)]);
        assert!(SeriesKind::SentimentLine.accepts(&line));
        assert!(!SeriesKind::Candlestick.accepts(&line));
        assert!(!SeriesKind::Histogram(HistogramPalette::Momentum).accepts(&line));
        let host = SeriesId::new(1);
        assert_eq!(SeriesKind::Markers { host }.host(), Some(host));
        assert!(SeriesKind::Markers { host }.empty_data().is_empty());
    }

    #[test]
    fn candle_scale_values_cover_body() {
        let data = SeriesData::Candles(vec![OhlcBar {
            time: 1.0,
            open: 12.0,
            high: 11.0,
            low: 9.0,
            close: 10.0,
        }]);
        let values: Vec<f64> = data.scale_values().collect();
        assert_eq!(values, vec![9.0, 12.0]);
        assert_eq!(data.times().collect::<Vec<_>>(), vec![1.0]);
    }
}
