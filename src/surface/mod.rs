//! Chart surface: the single drawing area every series of a chart shares.

mod chart_surface;
mod frame_builder;
mod options;
mod series;

pub use chart_surface::{
    ChartSurface, CrosshairMoveEvent, CrosshairMoveHandler, PointerPosition, SubscriptionId,
    SurfaceHandle, SurfaceStats, WeakSurfaceHandle,
};
pub use options::{SurfaceOptions, SurfaceOptionsPatch};
pub use series::{HistogramPalette, SeriesData, SeriesId, SeriesKind, SeriesOptions};
