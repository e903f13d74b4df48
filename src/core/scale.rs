use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Pixel interval a domain is projected onto.
///
/// `end < start` is allowed and flips the axis, which is how vertical scales
/// put larger values higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn horizontal(width: u32) -> Self {
        Self::new(0.0, f64::from(width))
    }

    #[must_use]
    pub fn length(self) -> f64 {
        (self.end - self.start).abs()
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.start.is_finite() || !self.end.is_finite() || self.start == self.end {
            return Err(ChartError::InvalidData(
                "pixel range must be finite and non-empty".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn domain_to_pixel(self, value: f64, range: PixelRange) -> ChartResult<f64> {
        let range = range.validate()?;
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(range.start + normalized * (range.end - range.start))
    }

    pub fn pixel_to_domain(self, pixel: f64, range: PixelRange) -> ChartResult<f64> {
        let range = range.validate()?;
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let normalized = (pixel - range.start) / (range.end - range.start);
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, PixelRange};

    #[test]
    fn inverted_range_maps_larger_values_higher() {
        let scale = LinearScale::new(0.0, 10.0).expect("scale");
        let range = PixelRange::new(100.0, 0.0);
        let low = scale.domain_to_pixel(1.0, range).expect("low");
        let high = scale.domain_to_pixel(9.0, range).expect("high");
        assert!(high < low);
        let back = scale.pixel_to_domain(high, range).expect("back");
        assert!((back - 9.0).abs() <= 1e-9);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        assert!(LinearScale::new(1.0, 1.0).is_err());
        let scale = LinearScale::new(0.0, 1.0).expect("scale");
        assert!(scale.domain_to_pixel(0.5, PixelRange::new(3.0, 3.0)).is_err());
        assert!(
            scale
                .domain_to_pixel(f64::NAN, PixelRange::horizontal(10))
                .is_err()
        );
    }
}
