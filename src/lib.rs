//! sentiment-chart: multi-series sentiment charting engine.
//!
//! One chart surface carries a price candlestick series plus synchronized
//! sentiment, confidence band, volume histogram, momentum pane, pattern and
//! event marker overlays. [`ChartOrchestrator`] owns their lifecycle, keeps
//! toggles and crosshair state in sync and tracks container resizes without
//! disturbing the user's viewport.

pub mod api;
pub mod coordinators;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod series;
pub mod surface;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{
    ChartEngineConfig, ChartOrchestrator, MountPhase, OverlayKind, ToggleState, ToolbarAction,
};
pub use coordinators::{ContainerSize, CrosshairSnapshot, CrosshairUpdate, ManualResizeObserver};
pub use error::{ChartError, ChartResult, LifecycleError};
