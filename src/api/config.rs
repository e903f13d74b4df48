use serde::{Deserialize, Serialize};

use crate::api::toggles::ToggleState;
use crate::core::{TimeScaleTuning, Timeframe};
use crate::error::{ChartError, ChartResult};
use crate::render::ChartStyle;
use crate::series::{
    DEFAULT_CONFIDENCE_SPREAD, DEFAULT_MOMENTUM_PANE_STRETCH, EventTiePolicy, HistogramMode,
};

/// Engine bootstrap configuration.
///
/// Serializable so hosts can persist chart setup; every field but `asset`
/// has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub asset: String,
    #[serde(default)]
    pub interval: Timeframe,
    /// Surface height in pixels, fixed for the lifetime of a mount.
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub toggles: ToggleState,
    #[serde(default)]
    pub style: ChartStyle,
    #[serde(default)]
    pub time_scale_tuning: TimeScaleTuning,
    #[serde(default)]
    pub event_tie_policy: EventTiePolicy,
    #[serde(default)]
    pub histogram_mode: HistogramMode,
    #[serde(default = "default_confidence_band_spread")]
    pub confidence_band_spread: f64,
    #[serde(default = "default_momentum_pane_stretch")]
    pub momentum_pane_stretch: f64,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            interval: Timeframe::default(),
            height: default_height(),
            toggles: ToggleState::default(),
            style: ChartStyle::default(),
            time_scale_tuning: TimeScaleTuning::default(),
            event_tie_policy: EventTiePolicy::default(),
            histogram_mode: HistogramMode::default(),
            confidence_band_spread: default_confidence_band_spread(),
            momentum_pane_stretch: default_momentum_pane_stretch(),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Timeframe) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_toggles(mut self, toggles: ToggleState) -> Self {
        self.toggles = toggles;
        self
    }

    /// Theme colours are applied verbatim.
    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_time_scale_tuning(mut self, tuning: TimeScaleTuning) -> Self {
        self.time_scale_tuning = tuning;
        self
    }

    #[must_use]
    pub fn with_event_tie_policy(mut self, policy: EventTiePolicy) -> Self {
        self.event_tie_policy = policy;
        self
    }

    #[must_use]
    pub fn with_histogram_mode(mut self, mode: HistogramMode) -> Self {
        self.histogram_mode = mode;
        self
    }

    #[must_use]
    pub fn with_confidence_band_spread(mut self, spread: f64) -> Self {
        self.confidence_band_spread = spread;
        self
    }

    #[must_use]
    pub fn with_momentum_pane_stretch(mut self, stretch: f64) -> Self {
        self.momentum_pane_stretch = stretch;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.asset.trim().is_empty() {
            return Err(ChartError::InvalidData("asset must not be empty".to_owned()));
        }
        if self.height == 0 {
            return Err(ChartError::InvalidViewport {
                width: 1,
                height: self.height,
            });
        }
        if !self.confidence_band_spread.is_finite() || self.confidence_band_spread <= 0.0 {
            return Err(ChartError::InvalidData(
                "confidence band spread must be finite and > 0".to_owned(),
            ));
        }
        if !self.momentum_pane_stretch.is_finite() || self.momentum_pane_stretch <= 0.0 {
            return Err(ChartError::InvalidData(
                "momentum pane stretch must be finite and > 0".to_owned(),
            ));
        }
        self.style.validate()?;
        self.time_scale_tuning.validate()?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a config document.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

fn default_height() -> u32 {
    600
}

fn default_confidence_band_spread() -> f64 {
    DEFAULT_CONFIDENCE_SPREAD
}

fn default_momentum_pane_stretch() -> f64 {
    DEFAULT_MOMENTUM_PANE_STRETCH
}

#[cfg(test)]
mod tests {
    use super::ChartEngineConfig;
    use crate::api::OverlayKind;
    use crate::core::Timeframe;
    use crate::series::{EventTiePolicy, HistogramMode};

    #[test]
    fn minimal_document_takes_defaults() {
        let config = ChartEngineConfig::from_json_str(r#"{"asset":"BTC"}"#).expect("valid");
        assert_eq!(config, ChartEngineConfig::new("BTC"));
        assert_eq!(config.height, 600);
        assert_eq!(config.interval, Timeframe::OneDay);
    }

    #[test]
    fn json_round_trip_keeps_every_field() {
        let config = ChartEngineConfig::new("ETH")
            .with_interval(Timeframe::SixHours)
            .with_height(420)
            .with_toggles(
                ChartEngineConfig::new("x")
                    .toggles
                    .with(OverlayKind::Patterns, false),
            )
            .with_event_tie_policy(EventTiePolicy::Stack)
            .with_histogram_mode(HistogramMode::SentimentIntensity)
            .with_confidence_band_spread(0.3);
        let json = config.to_json_pretty().expect("serialize");
        let restored = ChartEngineConfig::from_json_str(&json).expect("parse");
        // Colours are quantized to 8 bits per channel, so compare documents.
        assert_eq!(restored.to_json_pretty().expect("serialize again"), json);
        assert_eq!(restored.toggles, config.toggles);
        assert_eq!(restored.interval, Timeframe::SixHours);
        assert_eq!(restored.event_tie_policy, EventTiePolicy::Stack);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ChartEngineConfig::new(" ").validate().is_err());
        assert!(ChartEngineConfig::new("BTC").with_height(0).validate().is_err());
        assert!(
            ChartEngineConfig::new("BTC")
                .with_confidence_band_spread(-1.0)
                .validate()
                .is_err()
        );
        assert!(ChartEngineConfig::from_json_str(r#"{"asset":"BTC","interval":"2h"}"#).is_err());
    }
}
