use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Period, Symbol, UtcDateTime, ValidationError};

/// One daily OHLCV row of a price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    pub fn new(
        date: UtcDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidPriceRange);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Price series for one symbol and analysis window, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: Symbol,
    pub period: Period,
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Builds a history, ordering points chronologically.
    pub fn new(symbol: Symbol, period: Period, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|point| point.date);
        Self {
            symbol,
            period,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Point before the latest one, if the series has at least two points.
    pub fn previous(&self) -> Option<&PricePoint> {
        self.points.len().checked_sub(2).map(|idx| &self.points[idx])
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.close)
    }
}

/// Opaque issuer metadata as returned by the market-data provider.
///
/// Only a handful of fields are read; everything else passes through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerInfo(BTreeMap<String, Value>);

impl IssuerInfo {
    pub const MARKET_CAP: &'static str = "marketCap";
    pub const LONG_NAME: &'static str = "longName";
    pub const SHORT_NAME: &'static str = "shortName";
    pub const CURRENCY: &'static str = "currency";
    pub const EXCHANGE: &'static str = "exchangeName";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        if !value.is_null() {
            self.0.insert(field.into(), value);
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Market capitalization; zero and non-numeric values count as absent.
    pub fn market_cap(&self) -> Option<f64> {
        self.get(Self::MARKET_CAP)
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite() && *value > 0.0)
    }

    pub fn long_name(&self) -> Option<&str> {
        self.get(Self::LONG_NAME)
            .or_else(|| self.get(Self::SHORT_NAME))
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
    }

    pub fn currency(&self) -> Option<&str> {
        self.get(Self::CURRENCY).and_then(Value::as_str)
    }
}

impl FromIterator<(String, Value)> for IssuerInfo {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut info = Self::new();
        for (field, value) in iter {
            info.insert(field, value);
        }
        info
    }
}

/// One news item normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub summary: String,
    /// `YYYY-MM-DD HH:MM`, or empty when the provider time could not be read.
    pub published: String,
    pub published_at: Option<UtcDateTime>,
    pub source: String,
}

impl Headline {
    pub const UNKNOWN_SOURCE: &'static str = "Unknown";

    /// Text fed to the sentiment scorer: title and summary joined by a space.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
