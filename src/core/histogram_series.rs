use serde::{Deserialize, Serialize};

use crate::core::PlotContext;
use crate::error::{ChartError, ChartResult};

/// Direction a bar encodes; the renderer maps it to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BarTone {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl BarTone {
    /// Tone of a signed value, zero is neutral.
    #[must_use]
    pub fn of_sign(value: f64) -> Self {
        if value > 0.0 {
            BarTone::Positive
        } else if value < 0.0 {
            BarTone::Negative
        } else {
            BarTone::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramPoint {
    pub time: f64,
    pub value: f64,
    pub tone: BarTone,
}

impl HistogramPoint {
    #[must_use]
    pub const fn new(time: f64, value: f64, tone: BarTone) -> Self {
        Self { time, value, tone }
    }
}

/// Deterministic bar geometry for histogram-style series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBar {
    pub time: f64,
    pub x_center: f64,
    pub x_left: f64,
    pub x_right: f64,
    pub y_top: f64,
    pub y_bottom: f64,
    pub tone: BarTone,
}

/// Projects point data into histogram bars.
///
/// Each bar spans from `baseline` to the sample value and uses a fixed
/// `bar_width_px` around the mapped x-center. Non-finite samples are skipped.
pub fn project_histogram_bars(
    points: &[HistogramPoint],
    plot: &PlotContext,
    bar_width_px: f64,
    baseline: f64,
) -> ChartResult<Vec<HistogramBar>> {
    if !bar_width_px.is_finite() || bar_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "histogram bar width must be finite and > 0".to_owned(),
        ));
    }

    if points.is_empty() {
        return Ok(Vec::new());
    }

    let baseline_y = plot.y(baseline)?;
    let half_width = bar_width_px * 0.5;

    Ok(points
        .iter()
        .filter_map(|point| {
            let (x_center, y_value) = plot.project(point.time, point.value)?;
            Some(HistogramBar {
                time: point.time,
                x_center,
                x_left: x_center - half_width,
                x_right: x_center + half_width,
                y_top: y_value.min(baseline_y),
                y_bottom: y_value.max(baseline_y),
                tone: point.tone,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{BarTone, HistogramPoint, project_histogram_bars};
    use crate::core::{
        PaneId, PaneLayoutRegion, PlotContext, PriceScale, PriceScaleId, TimeScale,
    };

    #[test]
    fn bars_grow_away_from_zero_baseline() {
        let points = [
            HistogramPoint::new(1.0, 2.0, BarTone::Positive),
            HistogramPoint::new(2.0, -2.0, BarTone::Negative),
            HistogramPoint::new(3.0, f64::INFINITY, BarTone::Neutral),
        ];
        let plot = PlotContext {
            time_scale: TimeScale::new(0.0, 4.0).expect("time"),
            price_scale: PriceScale::resolve(PriceScaleId::Momentum.default_options(), [2.0, -2.0])
                .expect("resolve")
                .expect("scale"),
            width: 400,
            region: PaneLayoutRegion {
                pane_id: PaneId::new(1),
                plot_top: 0.0,
                plot_bottom: 100.0,
            },
        };
        let bars = project_histogram_bars(&points, &plot, 4.0, 0.0).expect("bars");
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].y_bottom, 50.0);
        assert_eq!(bars[1].y_top, 50.0);
        assert_eq!(bars[1].tone, BarTone::Negative);
        assert!(project_histogram_bars(&points, &plot, 0.0, 0.0).is_err());
    }

    #[test]
    fn tone_follows_sign() {
        assert_eq!(BarTone::of_sign(0.3), BarTone::Positive);
        assert_eq!(BarTone::of_sign(-0.3), BarTone::Negative);
        assert_eq!(BarTone::of_sign(0.0), BarTone::Neutral);
    }
}
