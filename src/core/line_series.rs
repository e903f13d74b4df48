use serde::{Deserialize, Serialize};

use crate::core::PlotContext;

/// One value on the shared time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub time: f64,
    pub value: f64,
}

impl LinePoint {
    #[must_use]
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Projected line segment in pixel coordinates.
///
/// `value` is the mean of the segment's endpoint values; segments never cross
/// the split threshold, so its sign is the sign of the whole segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub value: f64,
}

/// Projects points into adjacent line segments.
///
/// Non-finite samples break the line. Pairs sharing a time collapse into the
/// later sample, which is how duplicate timestamps overwrite in render order.
#[must_use]
pub fn project_line_segments(points: &[LinePoint], plot: &PlotContext) -> Vec<LineSegment> {
    project_split_segments(points, plot, None)
}

/// Like [`project_line_segments`], but splits any segment crossing `threshold`
/// at the crossing point so each piece lies on one side of it.
#[must_use]
pub fn project_line_segments_split_at(
    points: &[LinePoint],
    plot: &PlotContext,
    threshold: f64,
) -> Vec<LineSegment> {
    project_split_segments(points, plot, Some(threshold))
}

fn project_split_segments(
    points: &[LinePoint],
    plot: &PlotContext,
    threshold: Option<f64>,
) -> Vec<LineSegment> {
    let mut segments = Vec::with_capacity(points.len().saturating_sub(1));
    let mut previous: Option<LinePoint> = None;

    for point in points {
        if !point.time.is_finite() || !point.value.is_finite() {
            previous = None;
            continue;
        }
        let Some(prev) = previous.replace(*point) else {
            continue;
        };
        if prev.time == point.time {
            continue;
        }

        match threshold {
            Some(level) if crosses(prev.value, point.value, level) => {
                let ratio = (level - prev.value) / (point.value - prev.value);
                let crossing = LinePoint::new(prev.time + (point.time - prev.time) * ratio, level);
                push_segment(&mut segments, plot, prev, crossing);
                push_segment(&mut segments, plot, crossing, *point);
            }
            _ => push_segment(&mut segments, plot, prev, *point),
        }
    }

    segments
}

fn crosses(a: f64, b: f64, level: f64) -> bool {
    (a < level && b > level) || (a > level && b < level)
}

fn push_segment(out: &mut Vec<LineSegment>, plot: &PlotContext, from: LinePoint, to: LinePoint) {
    let (Some((x1, y1)), Some((x2, y2))) = (
        plot.project(from.time, from.value),
        plot.project(to.time, to.value),
    ) else {
        return;
    };
    out.push(LineSegment {
        x1,
        y1,
        x2,
        y2,
        value: (from.value + to.value) / 2.0,
    });
}
