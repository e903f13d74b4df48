use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult, LifecycleError};
use crate::surface::{SeriesData, SeriesId, SeriesOptions, SurfaceHandle};

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Uninitialized,
    Active {
        surface: SurfaceHandle,
        series: SeriesId,
    },
    Destroyed,
}

/// Lifecycle state shared by every series manager.
///
/// `Uninitialized -> Active -> Destroyed`, and back to `Active` through a
/// fresh `attach`. Misuse is logged and returned as a [`LifecycleError`].
#[derive(Debug)]
pub(crate) struct SeriesBinding {
    component: &'static str,
    phase: Phase,
}

impl SeriesBinding {
    pub(crate) const fn new(component: &'static str) -> Self {
        Self {
            component,
            phase: Phase::Uninitialized,
        }
    }

    pub(crate) fn attach(
        &mut self,
        surface: &SurfaceHandle,
        options: SeriesOptions,
    ) -> ChartResult<SeriesId> {
        if matches!(self.phase, Phase::Active { .. }) {
            return Err(self.misuse(LifecycleError::AlreadyInitialized {
                component: self.component,
            }));
        }

        let series = surface
            .borrow_mut()
            .add_series(options)
            .map_err(|err| {
                if matches!(
                    err.lifecycle(),
                    Some(LifecycleError::PriceSeriesRequired { .. })
                ) {
                    self.misuse(LifecycleError::PriceSeriesRequired {
                        component: self.component,
                    })
                } else {
                    err
                }
            })?;
        self.phase = Phase::Active {
            surface: surface.clone(),
            series,
        };
        debug!(
            manager = self.component,
            series = series.raw(),
            "series manager initialized"
        );
        Ok(series)
    }

    pub(crate) fn active(&self) -> ChartResult<(&SurfaceHandle, SeriesId)> {
        match &self.phase {
            Phase::Active { surface, series } => Ok((surface, *series)),
            Phase::Uninitialized => Err(self.misuse(LifecycleError::NotInitialized {
                component: self.component,
            })),
            Phase::Destroyed => Err(self.misuse(LifecycleError::Destroyed {
                component: self.component,
            })),
        }
    }

    pub(crate) fn replace_data(&self, data: SeriesData) -> ChartResult<()> {
        let (surface, series) = self.active()?;
        let count = data.len();
        surface.borrow_mut().set_series_data(series, data)?;
        debug!(manager = self.component, count, "series data replaced");
        Ok(())
    }

    pub(crate) fn set_visible(&self, visible: bool) -> ChartResult<()> {
        let (surface, series) = self.active()?;
        surface.borrow_mut().set_series_visible(series, visible)?;
        debug!(manager = self.component, visible, "series visibility changed");
        Ok(())
    }

    pub(crate) fn series_id(&self) -> Option<SeriesId> {
        match &self.phase {
            Phase::Active { series, .. } => Some(*series),
            _ => None,
        }
    }

    pub(crate) fn is_visible(&self) -> Option<bool> {
        match &self.phase {
            Phase::Active { surface, series } => surface.borrow().is_series_visible(*series),
            _ => None,
        }
    }

    /// Removes the series from its surface. No-op unless active.
    ///
    /// Returns the surface the series lived on so callers can release
    /// resources tied to it.
    pub(crate) fn detach(&mut self) -> Option<SurfaceHandle> {
        if !matches!(self.phase, Phase::Active { .. }) {
            debug!(manager = self.component, "destroy skipped: manager not active");
            return None;
        }
        let Phase::Active { surface, series } =
            std::mem::replace(&mut self.phase, Phase::Destroyed)
        else {
            return None;
        };

        let removed = {
            let mut surface = surface.borrow_mut();
            if surface.is_removed() {
                Ok(false)
            } else {
                surface.remove_series(series)
            }
        };
        if let Err(err) = removed {
            debug!(manager = self.component, error = %err, "series removal skipped");
        }
        debug!(manager = self.component, "series manager destroyed");
        Some(surface)
    }

    fn misuse(&self, err: LifecycleError) -> ChartError {
        warn!(manager = self.component, error = %err, "series manager misuse");
        err.into()
    }
}
