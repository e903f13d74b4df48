use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::error::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Emotion mix for one interval. Components are independent and need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    #[serde(default)]
    pub optimism: Option<f64>,
    #[serde(default)]
    pub fear: Option<f64>,
    #[serde(default)]
    pub anger: Option<f64>,
    #[serde(default)]
    pub neutral: Option<f64>,
}

/// One sample on the shared time axis.
///
/// `time` is unix seconds. Bounds on the remaining fields are the caller's
/// contract; the engine never rejects a point for violating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub sentiment: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_upper: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_lower: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<EmotionSnapshot>,
}

impl ChartPoint {
    #[must_use]
    pub fn new(time: f64, open: f64, high: f64, low: f64, close: f64, sentiment: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            sentiment,
            sentiment_upper: None,
            sentiment_lower: None,
            confidence: None,
            momentum: None,
            volume: None,
            emotion: None,
        }
    }

    /// Builds a point from strongly-typed time and decimal OHLC prices.
    pub fn from_decimal_ohlc(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        sentiment: f64,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            sentiment,
        ))
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    #[must_use]
    pub fn with_confidence_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.sentiment_lower = Some(lower);
        self.sentiment_upper = Some(upper);
        self
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = Some(momentum);
        self
    }

    #[must_use]
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn with_emotion(mut self, emotion: EmotionSnapshot) -> Self {
        self.emotion = Some(emotion);
        self
    }

    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Returns `true` when every documented bound holds.
    ///
    /// Used for diagnostics only; out-of-bound points are still rendered.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|value| !value.is_finite() || *value <= 0.0) || !self.time.is_finite()
        {
            return false;
        }
        if self.low > self.open.min(self.close) || self.high < self.open.max(self.close) {
            return false;
        }
        if !(-1.0..=1.0).contains(&self.sentiment) {
            return false;
        }
        if self
            .confidence
            .is_some_and(|value| !(0.0..=1.0).contains(&value))
        {
            return false;
        }
        !self.volume.is_some_and(|value| value < 0.0)
    }
}

/// Returns `true` when times are strictly ascending (sorted, no duplicates).
#[must_use]
pub fn is_strictly_ascending(points: &[ChartPoint]) -> bool {
    points.windows(2).all(|pair| pair[0].time < pair[1].time)
}

#[cfg(test)]
mod tests {
    use super::{ChartPoint, is_strictly_ascending};

    #[test]
    fn well_formed_point_passes_bounds_check() {
        let point = ChartPoint::new(10.0, 100.0, 105.0, 98.0, 102.0, 0.4).with_confidence(0.8);
        assert!(point.is_well_formed());
        assert!(point.is_bullish());
    }

    #[test]
    fn out_of_range_sentiment_is_flagged() {
        let point = ChartPoint::new(10.0, 100.0, 105.0, 98.0, 102.0, 1.7);
        assert!(!point.is_well_formed());
    }

    #[test]
    fn duplicate_times_are_not_strictly_ascending() {
        let a = ChartPoint::new(1.0, 1.0, 1.0, 1.0, 1.0, 0.0);
        let b = ChartPoint::new(1.0, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert!(!is_strictly_ascending(&[a.clone(), b]));
        assert!(is_strictly_ascending(&[a]));
    }

    #[test]
    fn camel_case_payload_deserializes() {
        let json = r#"{"time":1,"open":2,"high":3,"low":1,"close":2,"sentiment":0.1,
            "sentimentUpper":0.3,"sentimentLower":-0.1,"confidence":0.9}"#;
        let point: ChartPoint = serde_json::from_str(json).expect("valid payload");
        assert_eq!(point.sentiment_upper, Some(0.3));
        assert_eq!(point.sentiment_lower, Some(-0.1));
        assert_eq!(point.momentum, None);
    }
}
