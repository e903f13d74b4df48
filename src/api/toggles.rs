use std::fmt;

use serde::{Deserialize, Serialize};

/// Overlay the toolbar can show or hide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverlayKind {
    Sentiment,
    ConfidenceBand,
    Events,
    Momentum,
    Histogram,
    Patterns,
    Crosshair,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 7] = [
        OverlayKind::Sentiment,
        OverlayKind::ConfidenceBand,
        OverlayKind::Events,
        OverlayKind::Momentum,
        OverlayKind::Histogram,
        OverlayKind::Patterns,
        OverlayKind::Crosshair,
    ];

    /// Key used by hosts and in serialized toggle state.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            OverlayKind::Sentiment => "sentiment",
            OverlayKind::ConfidenceBand => "confidenceBand",
            OverlayKind::Events => "events",
            OverlayKind::Momentum => "momentum",
            OverlayKind::Histogram => "histogram",
            OverlayKind::Patterns => "patterns",
            OverlayKind::Crosshair => "crosshair",
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn enabled() -> bool {
    true
}

/// Visibility flag per overlay. Everything starts visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleState {
    #[serde(default = "enabled")]
    pub sentiment: bool,
    #[serde(default = "enabled")]
    pub confidence_band: bool,
    #[serde(default = "enabled")]
    pub events: bool,
    #[serde(default = "enabled")]
    pub momentum: bool,
    #[serde(default = "enabled")]
    pub histogram: bool,
    #[serde(default = "enabled")]
    pub patterns: bool,
    #[serde(default = "enabled")]
    pub crosshair: bool,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            sentiment: true,
            confidence_band: true,
            events: true,
            momentum: true,
            histogram: true,
            patterns: true,
            crosshair: true,
        }
    }
}

impl ToggleState {
    #[must_use]
    pub fn get(&self, kind: OverlayKind) -> bool {
        match kind {
            OverlayKind::Sentiment => self.sentiment,
            OverlayKind::ConfidenceBand => self.confidence_band,
            OverlayKind::Events => self.events,
            OverlayKind::Momentum => self.momentum,
            OverlayKind::Histogram => self.histogram,
            OverlayKind::Patterns => self.patterns,
            OverlayKind::Crosshair => self.crosshair,
        }
    }

    /// Sets one flag; returns `true` when it changed.
    pub fn set(&mut self, kind: OverlayKind, visible: bool) -> bool {
        let slot = match kind {
            OverlayKind::Sentiment => &mut self.sentiment,
            OverlayKind::ConfidenceBand => &mut self.confidence_band,
            OverlayKind::Events => &mut self.events,
            OverlayKind::Momentum => &mut self.momentum,
            OverlayKind::Histogram => &mut self.histogram,
            OverlayKind::Patterns => &mut self.patterns,
            OverlayKind::Crosshair => &mut self.crosshair,
        };
        let changed = *slot != visible;
        *slot = visible;
        changed
    }

    #[must_use]
    pub fn with(mut self, kind: OverlayKind, visible: bool) -> Self {
        self.set(kind, visible);
        self
    }

    /// Flags that differ between `self` and `other`.
    pub fn diff(self, other: ToggleState) -> impl Iterator<Item = ToggleChange> {
        OverlayKind::ALL
            .into_iter()
            .filter(move |kind| self.get(*kind) != other.get(*kind))
            .map(move |kind| ToggleChange {
                kind,
                visible: other.get(kind),
            })
    }
}

/// Published to toggle listeners when one flag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleChange {
    pub kind: OverlayKind,
    pub visible: bool,
}
