use serde::{Deserialize, Serialize};

use crate::core::PlotContext;

/// Upper and lower edge of a band at one time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub time: f64,
    pub upper: f64,
    pub lower: f64,
}

impl BandPoint {
    /// Builds a band point, swapping edges given in the wrong order.
    #[must_use]
    pub fn new(time: f64, upper: f64, lower: f64) -> Self {
        Self {
            time,
            upper: upper.max(lower),
            lower: upper.min(lower),
        }
    }

    #[must_use]
    pub fn is_zero_width(self) -> bool {
        self.upper == self.lower
    }
}

/// Vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaVertex {
    pub x: f64,
    pub y: f64,
}

/// Deterministic geometry for a band series.
///
/// `fill_polygon` walks the upper edge forward and the lower edge backward and
/// repeats the first vertex so consumers need no implicit closure rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BandGeometry {
    pub upper_line: Vec<AreaVertex>,
    pub lower_line: Vec<AreaVertex>,
    pub fill_polygon: Vec<AreaVertex>,
}

impl BandGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper_line.is_empty()
    }
}

/// Projects band points into edge lines and a closed fill polygon.
///
/// Samples with any non-finite component are skipped.
#[must_use]
pub fn project_band_geometry(points: &[BandPoint], plot: &PlotContext) -> BandGeometry {
    let mut upper_line = Vec::with_capacity(points.len());
    let mut lower_line = Vec::with_capacity(points.len());

    for point in points {
        let (Some((x, upper_y)), Some(lower_y)) = (
            plot.project(point.time, point.upper),
            plot.y(point.lower).ok(),
        ) else {
            continue;
        };
        upper_line.push(AreaVertex { x, y: upper_y });
        lower_line.push(AreaVertex { x, y: lower_y });
    }

    if upper_line.is_empty() {
        return BandGeometry::default();
    }

    let mut fill_polygon = Vec::with_capacity(upper_line.len() * 2 + 1);
    fill_polygon.extend(upper_line.iter().copied());
    fill_polygon.extend(lower_line.iter().rev().copied());
    fill_polygon.push(upper_line[0]);

    BandGeometry {
        upper_line,
        lower_line,
        fill_polygon,
    }
}
