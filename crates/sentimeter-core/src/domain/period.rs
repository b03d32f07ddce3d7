use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Analysis window selectable on the dashboard.
///
/// The string forms double as the market-data provider's `range` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
}

impl Period {
    /// Selector order as presented to the user.
    pub const ALL: [Self; 4] = [
        Self::OneMonth,
        Self::FiveDays,
        Self::ThreeMonths,
        Self::SixMonths,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::FiveDays => "5d",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
        }
    }

    /// Approximate number of daily bars the window spans.
    pub const fn trading_days(self) -> usize {
        match self {
            Self::FiveDays => 5,
            Self::OneMonth => 21,
            Self::ThreeMonths => 63,
            Self::SixMonths => 126,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Self::OneMonth),
            "5d" => Ok(Self::FiveDays),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            other => Err(ValidationError::InvalidPeriod {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period() {
        let period = Period::from_str("3MO").expect("must parse");
        assert_eq!(period, Period::ThreeMonths);
    }

    #[test]
    fn defaults_to_one_month() {
        assert_eq!(Period::default(), Period::OneMonth);
        assert_eq!(Period::ALL[0], Period::default());
    }

    #[test]
    fn rejects_unlisted_period() {
        let err = Period::from_str("1y").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidPeriod { .. }));
    }

    #[test]
    fn serializes_as_range_string() {
        let json = serde_json::to_string(&Period::FiveDays).expect("serializes");
        assert_eq!(json, "\"5d\"");
    }
}
