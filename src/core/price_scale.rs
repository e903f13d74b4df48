use serde::{Deserialize, Serialize};

use crate::core::pane::PaneLayoutRegion;
use crate::core::scale::{LinearScale, PixelRange};
use crate::error::{ChartError, ChartResult};

/// Vertical scale a series is bound to inside its pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceScaleId {
    /// Autoscaled price axis of the main pane.
    Right,
    /// Fixed `[-1, 1]` overlay scale for sentiment scores.
    Sentiment,
    /// Autoscaled overlay squeezed into the bottom quarter of the price pane.
    Histogram,
    /// Zero-centered scale of the momentum pane.
    Momentum,
}

/// How a scale derives its domain from the series bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScaleFit {
    /// Min/max of the visible values.
    Auto,
    /// Constant domain; values outside are clamped visually.
    Fixed { min: f64, max: f64 },
    /// `[-m, m]` where `m` is the largest absolute value.
    SymmetricAroundZero,
    /// `[0, max]`.
    ZeroBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScaleOptions {
    pub fit: ScaleFit,
    pub top_margin_ratio: f64,
    pub bottom_margin_ratio: f64,
}

impl PriceScaleId {
    #[must_use]
    pub fn default_options(self) -> PriceScaleOptions {
        match self {
            PriceScaleId::Right => PriceScaleOptions {
                fit: ScaleFit::Auto,
                top_margin_ratio: 0.1,
                bottom_margin_ratio: 0.1,
            },
            PriceScaleId::Sentiment => PriceScaleOptions {
                fit: ScaleFit::Fixed {
                    min: -1.0,
                    max: 1.0,
                },
                top_margin_ratio: 0.1,
                bottom_margin_ratio: 0.1,
            },
            PriceScaleId::Histogram => PriceScaleOptions {
                fit: ScaleFit::ZeroBased,
                top_margin_ratio: 0.75,
                bottom_margin_ratio: 0.0,
            },
            PriceScaleId::Momentum => PriceScaleOptions {
                fit: ScaleFit::SymmetricAroundZero,
                top_margin_ratio: 0.1,
                bottom_margin_ratio: 0.1,
            },
        }
    }
}

/// Resolved vertical mapping for one scale within one pane region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceScale {
    linear: LinearScale,
    top_margin_ratio: f64,
    bottom_margin_ratio: f64,
    clamp: bool,
}

impl PriceScale {
    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        let (min, max) = widen_degenerate(min, max)?;
        Ok(Self {
            linear: LinearScale::new(min, max)?,
            top_margin_ratio: 0.0,
            bottom_margin_ratio: 0.0,
            clamp: false,
        })
    }

    /// Resolves a scale from the values bound to it.
    ///
    /// Returns `Ok(None)` when an auto-fitted scale has no finite value to fit.
    pub fn resolve(
        options: PriceScaleOptions,
        values: impl IntoIterator<Item = f64>,
    ) -> ChartResult<Option<Self>> {
        validate_margins(options.top_margin_ratio, options.bottom_margin_ratio)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.into_iter().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }

        let (domain_min, domain_max, clamp) = match options.fit {
            ScaleFit::Fixed { min, max } => (min, max, true),
            _ if min > max => return Ok(None),
            ScaleFit::Auto => (min, max, false),
            ScaleFit::SymmetricAroundZero => {
                let extent = min.abs().max(max.abs());
                (-extent, extent, false)
            }
            ScaleFit::ZeroBased => (min.min(0.0), max.max(0.0), false),
        };

        let mut scale = Self::new(domain_min, domain_max)?;
        scale.top_margin_ratio = options.top_margin_ratio;
        scale.bottom_margin_ratio = options.bottom_margin_ratio;
        scale.clamp = clamp;
        Ok(Some(scale))
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    /// Maps a value to pixel Y inside `region`, larger values higher.
    pub fn value_to_y(self, value: f64, region: PaneLayoutRegion) -> ChartResult<f64> {
        let value = if self.clamp {
            let (min, max) = self.domain();
            value.clamp(min, max)
        } else {
            value
        };
        self.linear.domain_to_pixel(value, self.pixel_range(region)?)
    }

    pub fn y_to_value(self, y: f64, region: PaneLayoutRegion) -> ChartResult<f64> {
        self.linear.pixel_to_domain(y, self.pixel_range(region)?)
    }

    fn pixel_range(self, region: PaneLayoutRegion) -> ChartResult<PixelRange> {
        let height = region.height();
        if height <= 0.0 {
            return Err(ChartError::InvalidData(
                "pane region must have positive height".to_owned(),
            ));
        }
        let bottom = region.plot_bottom - height * self.bottom_margin_ratio;
        let top = region.plot_top + height * self.top_margin_ratio;
        if bottom <= top {
            return Ok(PixelRange::new(region.plot_bottom, region.plot_top));
        }
        Ok(PixelRange::new(bottom, top))
    }
}

fn widen_degenerate(min: f64, max: f64) -> ChartResult<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ChartError::InvalidData(
            "price scale domain must be finite".to_owned(),
        ));
    }
    if min == max {
        let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.01 };
        return Ok((min - pad, max + pad));
    }
    Ok((min.min(max), min.max(max)))
}

fn validate_margins(top: f64, bottom: f64) -> ChartResult<()> {
    if !top.is_finite() || !bottom.is_finite() || top < 0.0 || bottom < 0.0 || top + bottom >= 1.0
    {
        return Err(ChartError::InvalidData(
            "price scale margins must be finite, >= 0 and sum to < 1".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PriceScale, PriceScaleId, ScaleFit};
    use crate::core::pane::{PaneId, PaneLayoutRegion};

    fn region() -> PaneLayoutRegion {
        PaneLayoutRegion {
            pane_id: PaneId::PRICE,
            plot_top: 0.0,
            plot_bottom: 100.0,
        }
    }

    #[test]
    fn auto_fit_respects_margins() {
        let scale = PriceScale::resolve(PriceScaleId::Right.default_options(), [10.0, 20.0])
            .expect("resolve")
            .expect("values present");
        let top = scale.value_to_y(20.0, region()).expect("top");
        let bottom = scale.value_to_y(10.0, region()).expect("bottom");
        assert!((top - 10.0).abs() <= 1e-9);
        assert!((bottom - 90.0).abs() <= 1e-9);
    }

    #[test]
    fn fixed_sentiment_scale_clamps_out_of_range_values() {
        let scale = PriceScale::resolve(PriceScaleId::Sentiment.default_options(), [])
            .expect("resolve")
            .expect("fixed scale resolves without values");
        let at_max = scale.value_to_y(1.0, region()).expect("max");
        let beyond = scale.value_to_y(4.0, region()).expect("beyond");
        assert_eq!(at_max, beyond);
        assert_eq!(
            PriceScaleId::Sentiment.default_options().fit,
            ScaleFit::Fixed {
                min: -1.0,
                max: 1.0
            }
        );
    }

    #[test]
    fn symmetric_fit_centers_zero() {
        let scale = PriceScale::resolve(PriceScaleId::Momentum.default_options(), [-2.0, 5.0])
            .expect("resolve")
            .expect("values present");
        assert_eq!(scale.domain(), (-5.0, 5.0));
        let zero = scale.value_to_y(0.0, region()).expect("zero");
        assert!((zero - 50.0).abs() <= 1e-9);
    }

    #[test]
    fn auto_fit_without_values_is_none() {
        let resolved =
            PriceScale::resolve(PriceScaleId::Right.default_options(), [f64::NAN]).expect("ok");
        assert!(resolved.is_none());
    }
}
