use serde::{Deserialize, Serialize};

use crate::core::{BarTone, EventCategory, EventSeverity, PatternBias, PatternStrength};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, LineStrokeStyle};

/// Theme applied verbatim to every primitive the engine emits.
///
/// Defaults reproduce the dark sentiment palette. Every field can be
/// overridden from JSON; missing fields keep their default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub background: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub grid_line: Color,
    pub border: Color,

    pub candle_up: Color,
    pub candle_down: Color,
    pub wick_up: Color,
    pub wick_down: Color,
    pub candle_body_fill_ratio: f64,

    pub sentiment_bullish: Color,
    pub sentiment_bearish: Color,
    pub sentiment_neutral: Color,
    pub sentiment_very_bullish: Color,
    pub sentiment_very_bearish: Color,
    /// Absolute sentiment above which the "very" colours apply.
    pub sentiment_strong_threshold: f64,
    pub sentiment_line_width: f64,

    pub confidence_upper: Color,
    pub confidence_lower: Color,
    pub confidence_fill: Color,
    pub confidence_line_width: f64,
    pub confidence_line_style: LineStrokeStyle,

    pub momentum_positive: Color,
    pub momentum_negative: Color,
    pub momentum_zero_line: Color,

    pub histogram_up: Color,
    pub histogram_down: Color,
    pub histogram_bar_fill_ratio: f64,

    pub event_earnings: Color,
    pub event_news: Color,
    pub event_macro: Color,
    pub event_product: Color,
    pub event_custom: Color,

    pub crosshair_line: Color,
    pub crosshair_line_width: f64,
    pub crosshair_line_style: LineStrokeStyle,

    pub label_font_size_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        let bullish = Color::rgb8(0x10, 0xb9, 0x81);
        let bearish = Color::rgb8(0xef, 0x44, 0x44);
        let neutral = Color::rgb8(0x6b, 0x72, 0x80);
        let cyan = Color::rgb8(0x06, 0xb6, 0xd4);
        let purple = Color::rgb8(0xa8, 0x55, 0xf7);
        let amber = Color::rgb8(0xf5, 0x9e, 0x0b);
        let text_secondary = Color::rgb8(0x9c, 0xa3, 0xaf);

        Self {
            background: Color::rgb8(0x0f, 0x14, 0x19),
            text_primary: Color::rgb8(0xe5, 0xe7, 0xeb),
            text_secondary,
            grid_line: Color::rgb8(0x1f, 0x29, 0x37),
            border: Color::rgb8(0x2d, 0x37, 0x48),

            candle_up: bullish,
            candle_down: bearish,
            wick_up: Color::rgb8(0x05, 0x96, 0x69),
            wick_down: Color::rgb8(0xdc, 0x26, 0x26),
            candle_body_fill_ratio: 0.7,

            sentiment_bullish: bullish,
            sentiment_bearish: bearish,
            sentiment_neutral: neutral,
            sentiment_very_bullish: Color::rgb8(0x34, 0xd3, 0x99),
            sentiment_very_bearish: Color::rgb8(0xf8, 0x71, 0x71),
            sentiment_strong_threshold: 0.5,
            sentiment_line_width: 2.0,

            confidence_upper: cyan.with_alpha(0.5),
            confidence_lower: cyan.with_alpha(0.3),
            confidence_fill: cyan.with_alpha(0.12),
            confidence_line_width: 1.0,
            confidence_line_style: LineStrokeStyle::Dashed,

            momentum_positive: bullish,
            momentum_negative: bearish,
            momentum_zero_line: neutral,

            histogram_up: bullish,
            histogram_down: bearish,
            histogram_bar_fill_ratio: 0.6,

            event_earnings: amber,
            event_news: cyan,
            event_macro: purple,
            event_product: bullish,
            event_custom: text_secondary,

            crosshair_line: cyan,
            crosshair_line_width: 1.0,
            crosshair_line_style: LineStrokeStyle::Dashed,

            label_font_size_px: 12.0,
        }
    }
}

impl ChartStyle {
    /// Colour of a sentiment value, split at zero and at the strong threshold.
    #[must_use]
    pub fn sentiment_color(&self, sentiment: f64) -> Color {
        let strong = self.sentiment_strong_threshold;
        if sentiment > strong {
            self.sentiment_very_bullish
        } else if sentiment > 0.0 {
            self.sentiment_bullish
        } else if sentiment < -strong {
            self.sentiment_very_bearish
        } else if sentiment < 0.0 {
            self.sentiment_bearish
        } else {
            self.sentiment_neutral
        }
    }

    #[must_use]
    pub fn event_color(&self, category: EventCategory) -> Color {
        match category {
            EventCategory::Earnings => self.event_earnings,
            EventCategory::News => self.event_news,
            EventCategory::Macro => self.event_macro,
            EventCategory::Product => self.event_product,
            EventCategory::Custom => self.event_custom,
        }
    }

    /// Event colour faded by severity.
    #[must_use]
    pub fn event_marker_color(&self, category: EventCategory, severity: EventSeverity) -> Color {
        let color = self.event_color(category);
        let alpha = match severity {
            EventSeverity::Low => 0.55,
            EventSeverity::Medium => 0.8,
            EventSeverity::High => 1.0,
        };
        color.with_alpha(color.alpha * alpha)
    }

    #[must_use]
    pub fn momentum_color(&self, tone: BarTone) -> Color {
        match tone {
            BarTone::Positive => self.momentum_positive,
            BarTone::Negative => self.momentum_negative,
            BarTone::Neutral => self.momentum_zero_line,
        }
    }

    #[must_use]
    pub fn histogram_color(&self, tone: BarTone) -> Color {
        match tone {
            BarTone::Positive | BarTone::Neutral => self.histogram_up,
            BarTone::Negative => self.histogram_down,
        }
    }

    #[must_use]
    pub fn pattern_border_color(&self, bias: PatternBias) -> Color {
        match bias {
            PatternBias::Bullish => self.sentiment_bullish,
            PatternBias::Bearish => self.sentiment_bearish,
            PatternBias::Neutral => self.sentiment_neutral,
        }
    }

    /// Translucent pattern fill; stronger patterns are more opaque.
    #[must_use]
    pub fn pattern_fill_color(&self, bias: PatternBias, strength: Option<PatternStrength>) -> Color {
        let alpha = match strength {
            Some(PatternStrength::Strong) => 0.25,
            Some(PatternStrength::Moderate) => 0.15,
            Some(PatternStrength::Weak) | None => 0.08,
        };
        self.pattern_border_color(bias).with_alpha(alpha)
    }

    pub fn validate(self) -> ChartResult<Self> {
        for color in [
            self.background,
            self.text_primary,
            self.text_secondary,
            self.grid_line,
            self.border,
            self.candle_up,
            self.candle_down,
            self.wick_up,
            self.wick_down,
            self.sentiment_bullish,
            self.sentiment_bearish,
            self.sentiment_neutral,
            self.sentiment_very_bullish,
            self.sentiment_very_bearish,
            self.confidence_upper,
            self.confidence_lower,
            self.confidence_fill,
            self.momentum_positive,
            self.momentum_negative,
            self.momentum_zero_line,
            self.histogram_up,
            self.histogram_down,
            self.event_earnings,
            self.event_news,
            self.event_macro,
            self.event_product,
            self.event_custom,
            self.crosshair_line,
        ] {
            color.validate()?;
        }

        for (value, name) in [
            (self.sentiment_line_width, "sentiment_line_width"),
            (self.confidence_line_width, "confidence_line_width"),
            (self.crosshair_line_width, "crosshair_line_width"),
            (self.label_font_size_px, "label_font_size_px"),
        ] {
            positive(value, name)?;
        }

        for (value, name) in [
            (self.candle_body_fill_ratio, "candle_body_fill_ratio"),
            (self.histogram_bar_fill_ratio, "histogram_bar_fill_ratio"),
        ] {
            positive(value, name)?;
            if value > 1.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be <= 1"
                )));
            }
        }

        if !self.sentiment_strong_threshold.is_finite() || self.sentiment_strong_threshold < 0.0 {
            return Err(ChartError::InvalidData(
                "style `sentiment_strong_threshold` must be finite and >= 0".to_owned(),
            ));
        }

        Ok(self)
    }
}

fn positive(value: f64, name: &str) -> ChartResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ChartError::InvalidData(format!(
            "style `{name}` must be finite and > 0"
        )));
    }
    Ok(())
}
