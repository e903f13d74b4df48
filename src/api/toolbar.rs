use serde::{Deserialize, Serialize};

use crate::api::toggles::OverlayKind;
use crate::core::Timeframe;

/// Each zoom-in step moves both visible edges inward by this share of the span.
pub const ZOOM_IN_INSET_RATIO: f64 = 0.2;
/// Each zoom-out step moves both visible edges outward by this share of the span.
pub const ZOOM_OUT_INSET_RATIO: f64 = -0.1;

/// Command issued by the chart toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum ToolbarAction {
    SetTimeframe(Timeframe),
    /// Flips one overlay.
    Toggle(OverlayKind),
    AutoFit,
    ZoomIn,
    ZoomOut,
    /// Accepted for toolbar parity; the engine has no comparison mode.
    Compare,
}
