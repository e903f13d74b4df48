use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// Sampling interval of the displayed series.
///
/// This is the only timeframe type in the crate; toolbar actions, config and
/// callbacks all reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::OneHour,
        Timeframe::SixHours,
        Timeframe::OneDay,
        Timeframe::SevenDays,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneHour => "1h",
            Timeframe::SixHours => "6h",
            Timeframe::OneDay => "1d",
            Timeframe::SevenDays => "7d",
        }
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        match self {
            Timeframe::OneHour => Duration::hours(1),
            Timeframe::SixHours => Duration::hours(6),
            Timeframe::OneDay => Duration::days(1),
            Timeframe::SevenDays => Duration::days(7),
        }
    }

    #[must_use]
    pub fn seconds(self) -> f64 {
        self.duration().num_seconds() as f64
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = ChartError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.label() == value.trim())
            .ok_or_else(|| ChartError::InvalidData(format!("unknown timeframe `{value}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::Timeframe;

    #[test]
    fn labels_parse_back() {
        for timeframe in Timeframe::ALL {
            let parsed: Timeframe = timeframe.label().parse().expect("known label");
            assert_eq!(parsed, timeframe);
        }
        assert!("2h".parse::<Timeframe>().is_err());
    }

    #[test]
    fn seconds_match_interval() {
        assert_eq!(Timeframe::OneHour.seconds(), 3_600.0);
        assert_eq!(Timeframe::SevenDays.seconds(), 604_800.0);
    }

    #[test]
    fn serde_uses_short_labels() {
        let json = serde_json::to_string(&Timeframe::SixHours).expect("serialize");
        assert_eq!(json, "\"6h\"");
    }
}
