use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{ChartPoint, PlotContext};
use crate::error::{ChartError, ChartResult};

/// Doji bodies still get this many pixels so they stay visible.
const MIN_BODY_HEIGHT_PX: f64 = 1.0;

/// Price candle as held by the price series.
///
/// Stored unchecked: a sample with an inverted wick still renders, see
/// [`OhlcBar::envelope`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl OhlcBar {
    #[must_use]
    pub fn from_point(point: &ChartPoint) -> Self {
        Self {
            time: point.time,
            open: point.open,
            high: point.high,
            low: point.low,
            close: point.close,
        }
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.time.is_finite()
            && self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }

    /// Lowest and highest price touched by the candle, open and close included.
    #[must_use]
    pub fn envelope(self) -> (f64, f64) {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        (self.low.min(body_low), self.high.max(body_high))
    }
}

/// One candle in pixel space. Vertical spans are `(top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandleGeometry {
    pub time: f64,
    pub x: f64,
    pub half_width: f64,
    pub body: (f64, f64),
    pub wick: (f64, f64),
    pub bullish: bool,
}

impl CandleGeometry {
    #[must_use]
    pub fn body_left(self) -> f64 {
        self.x - self.half_width
    }

    #[must_use]
    pub fn body_right(self) -> f64 {
        self.x + self.half_width
    }
}

/// Projects the price series into candle geometry.
///
/// Bars with a non-finite field, or outside what the plot can map, are
/// left out.
pub fn project_candles(
    bars: &[OhlcBar],
    plot: &PlotContext,
    body_width_px: f64,
) -> ChartResult<Vec<CandleGeometry>> {
    if !body_width_px.is_finite() || body_width_px <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "candle body width must be finite and > 0, got {body_width_px}"
        )));
    }
    let half_width = body_width_px / 2.0;

    #[cfg(feature = "parallel-projection")]
    let geometry: Vec<CandleGeometry> = bars
        .par_iter()
        .filter_map(|bar| project_bar(*bar, plot, half_width))
        .collect();
    #[cfg(not(feature = "parallel-projection"))]
    let geometry: Vec<CandleGeometry> = bars
        .iter()
        .filter_map(|bar| project_bar(*bar, plot, half_width))
        .collect();

    Ok(geometry)
}

fn project_bar(bar: OhlcBar, plot: &PlotContext, half_width: f64) -> Option<CandleGeometry> {
    if !bar.is_finite() {
        return None;
    }
    let (low, high) = bar.envelope();
    let open = plot.y(bar.open).ok()?;
    let close = plot.y(bar.close).ok()?;
    let top = open.min(close);
    Some(CandleGeometry {
        time: bar.time,
        x: plot.x(bar.time).ok()?,
        half_width,
        body: (top, open.max(close).max(top + MIN_BODY_HEIGHT_PX)),
        wick: (plot.y(high).ok()?, plot.y(low).ok()?),
        bullish: bar.is_bullish(),
    })
}

#[cfg(test)]
mod tests {
    use super::{OhlcBar, project_candles};
    use crate::core::{
        PaneId, PaneLayoutRegion, PlotContext, PriceScale, PriceScaleId, TimeScale,
    };

    fn bar(time: f64, open: f64, high: f64, low: f64, close: f64) -> OhlcBar {
        OhlcBar {
            time,
            open,
            high,
            low,
            close,
        }
    }

    fn plot() -> PlotContext {
        PlotContext {
            time_scale: TimeScale::new(0.0, 10.0).expect("time"),
            price_scale: PriceScale::resolve(PriceScaleId::Right.default_options(), [0.0, 100.0])
                .expect("resolve")
                .expect("scale"),
            width: 100,
            region: PaneLayoutRegion {
                pane_id: PaneId::PRICE,
                plot_top: 0.0,
                plot_bottom: 200.0,
            },
        }
    }

    #[test]
    fn bars_with_nan_fields_are_left_out() {
        let bars = [
            bar(1.0, 10.0, 20.0, 5.0, 15.0),
            bar(2.0, 10.0, f64::NAN, 5.0, 15.0),
        ];
        let candles = project_candles(&bars, &plot(), 6.0).expect("project");
        assert_eq!(candles.len(), 1);
        let candle = candles[0];
        assert!(candle.bullish);
        assert!((candle.body_right() - candle.body_left() - 6.0).abs() < 1e-9);
        assert!(candle.wick.0 <= candle.body.0);
        assert!(candle.wick.1 >= candle.body.1);
    }

    #[test]
    fn doji_body_keeps_a_visible_height() {
        let candles =
            project_candles(&[bar(3.0, 50.0, 60.0, 40.0, 50.0)], &plot(), 4.0).expect("project");
        assert!(candles[0].body.1 - candles[0].body.0 >= 1.0);
    }

    #[test]
    fn inverted_wick_is_widened_to_cover_the_body() {
        assert_eq!(bar(2.0, 50.0, 40.0, 45.0, 60.0).envelope(), (45.0, 60.0));
    }

    #[test]
    fn zero_body_width_is_rejected() {
        assert!(project_candles(&[], &plot(), 0.0).is_err());
    }
}
