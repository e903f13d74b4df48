use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Stable identifier of a vertical pane on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaneId(u32);

impl PaneId {
    pub const PRICE: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What a pane is for. The price pane always exists and sits on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaneRole {
    Price,
    Momentum,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneDescriptor {
    pub id: PaneId,
    pub role: PaneRole,
    /// Relative height weight.
    pub stretch_factor: f64,
}

/// Vertical pixel band assigned to one pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneLayoutRegion {
    pub pane_id: PaneId,
    pub plot_top: f64,
    pub plot_bottom: f64,
}

impl PaneLayoutRegion {
    #[must_use]
    pub fn height(self) -> f64 {
        (self.plot_bottom - self.plot_top).max(0.0)
    }
}

/// Panes of a surface, stacked top to bottom in insertion order, at most one
/// per role.
#[derive(Debug, Clone, PartialEq)]
pub struct PaneCollection {
    by_role: IndexMap<PaneRole, PaneDescriptor>,
    next_id: u32,
}

impl Default for PaneCollection {
    fn default() -> Self {
        let price = PaneDescriptor {
            id: PaneId::PRICE,
            role: PaneRole::Price,
            stretch_factor: 1.0,
        };
        Self {
            by_role: IndexMap::from([(PaneRole::Price, price)]),
            next_id: 1,
        }
    }
}

impl PaneCollection {
    pub fn iter(&self) -> impl Iterator<Item = &PaneDescriptor> {
        self.by_role.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_role.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_role.is_empty()
    }

    #[must_use]
    pub fn pane_for_role(&self, role: PaneRole) -> Option<PaneId> {
        self.by_role.get(&role).map(|pane| pane.id)
    }

    /// Returns the pane for `role`, appending it at the bottom when missing.
    ///
    /// An existing pane keeps its original stretch factor.
    pub fn ensure_pane(&mut self, role: PaneRole, stretch_factor: f64) -> ChartResult<PaneId> {
        if let Some(pane) = self.by_role.get(&role) {
            return Ok(pane.id);
        }
        if !stretch_factor.is_finite() || stretch_factor <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "stretch factor for {role:?} pane must be finite and > 0, got {stretch_factor}"
            )));
        }
        let id = PaneId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.by_role.insert(
            role,
            PaneDescriptor {
                id,
                role,
                stretch_factor,
            },
        );
        Ok(id)
    }

    /// Drops the pane for `role`. Returns whether a pane was removed.
    pub fn release(&mut self, role: PaneRole) -> ChartResult<bool> {
        if role == PaneRole::Price {
            return Err(ChartError::InvalidData(
                "the price pane cannot be released".to_owned(),
            ));
        }
        Ok(self.by_role.shift_remove(&role).is_some())
    }

    /// Splits `height` pixels between panes proportionally to their stretch
    /// factors. The last pane absorbs rounding so regions tile exactly.
    #[must_use]
    pub fn layout_regions(&self, height: f64) -> Vec<PaneLayoutRegion> {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let total_weight: f64 = self.iter().map(|pane| pane.stretch_factor).sum();
        let last = self.len().saturating_sub(1);

        let mut top = 0.0;
        let mut accumulated = 0.0;
        self.iter()
            .enumerate()
            .map(|(index, pane)| {
                accumulated += pane.stretch_factor;
                let bottom = if index == last {
                    height
                } else {
                    (height * accumulated / total_weight).clamp(top, height)
                };
                let region = PaneLayoutRegion {
                    pane_id: pane.id,
                    plot_top: top,
                    plot_bottom: bottom,
                };
                top = bottom;
                region
            })
            .collect()
    }
}
