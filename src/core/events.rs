use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Earnings,
    News,
    Macro,
    Product,
    #[default]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    Low,
    #[default]
    Medium,
    High,
}

/// Discrete occurrence attached to the sample whose `time` equals `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEvent {
    pub id: String,
    pub time: f64,
    #[serde(default, rename = "type")]
    pub category: EventCategory,
    pub label: String,
    #[serde(default)]
    pub severity: EventSeverity,
    /// Signed sentiment delta attributed to the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<f64>,
}

impl ChartEvent {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        time: f64,
        category: EventCategory,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            time,
            category,
            label: label.into(),
            severity: EventSeverity::default(),
            impact: None,
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: EventSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_impact(mut self, impact: f64) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Two-letter badge drawn next to the marker.
    #[must_use]
    pub fn badge_text(&self) -> String {
        self.label
            .chars()
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatternBias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternStrength {
    Weak,
    Moderate,
    Strong,
}

/// Detected chart pattern spanning `[start_time, end_time]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPattern {
    pub id: String,
    /// Machine-readable kind, e.g. `bullish-engulfing`.
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    /// Detector confidence in `0..=100`.
    pub confidence: f64,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default)]
    pub bias: PatternBias,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<PatternStrength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ChartPattern {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        label: impl Into<String>,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            label: label.into(),
            confidence: 0.0,
            start_time,
            end_time,
            bias: PatternBias::default(),
            strength: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_bias(mut self, bias: PatternBias) -> Self {
        self.bias = bias;
        self
    }

    #[must_use]
    pub fn with_strength(mut self, strength: PatternStrength) -> Self {
        self.strength = Some(strength);
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Time span normalized so that `start <= end`.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        (
            self.start_time.min(self.end_time),
            self.start_time.max(self.end_time),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartEvent, EventCategory};

    #[test]
    fn badge_text_uses_first_two_letters_uppercased() {
        let event = ChartEvent::new("e1", 10.0, EventCategory::Earnings, "earnings beat");
        assert_eq!(event.badge_text(), "EA");
        let short = ChartEvent::new("e2", 10.0, EventCategory::News, "x");
        assert_eq!(short.badge_text(), "X");
    }

    #[test]
    fn event_payload_uses_type_key_for_category() {
        let json = r#"{"id":"n1","time":5,"type":"macro","label":"CPI print"}"#;
        let event: ChartEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event.category, EventCategory::Macro);
        assert!(event.impact.is_none());
    }
}
