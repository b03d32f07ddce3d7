//! # Sentiment scoring
//!
//! Headline text is scored by a [`SentimentModel`] into polarity and subjectivity, then
//! labeled with [`classify`]. Per-headline results roll up into an
//! [`AggregateSentiment`].
//!
//! | Model | Polarity | Subjectivity |
//! |-------|----------|--------------|
//! | [`VaderModel::new`] (default) | VADER compound score | share of non-neutral tokens |
//! | [`VaderModel::finance`] | compound plus a market keyword boost | share of non-neutral tokens |
//!
//! ```rust
//! use sentimeter_core::sentiment::{SentimentLabel, SentimentScorer};
//!
//! let scorer = SentimentScorer::default();
//! assert_eq!(scorer.score("").label, SentimentLabel::Neutral);
//! assert_eq!(scorer.score("Excellent results, great quarter").label, SentimentLabel::Positive);
//! ```

mod aggregate;
mod vader;

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use aggregate::{AggregateSentiment, LabelDistribution};
pub use vader::VaderModel;

use crate::{Headline, ValidationError};

/// Polarity strictly above this is positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity strictly below this is negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Categorical sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [Self; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a polarity to its label. Both thresholds are exclusive, so ±0.1 is neutral.
pub fn classify(polarity: f64) -> SentimentLabel {
    if polarity > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Score of one piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// In `[-1.0, 1.0]`.
    pub polarity: f64,
    /// In `[0.0, 1.0]`.
    pub subjectivity: f64,
    pub label: SentimentLabel,
}

impl SentimentResult {
    /// Clamps raw model output into range and labels it. Non-finite values become 0.
    pub fn new(polarity: f64, subjectivity: f64) -> Self {
        let polarity = finite_or_zero(polarity).clamp(-1.0, 1.0);
        let subjectivity = finite_or_zero(subjectivity).clamp(0.0, 1.0);
        Self {
            polarity,
            subjectivity,
            label: classify(polarity),
        }
    }

    pub fn neutral() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Text-to-(polarity, subjectivity) model.
///
/// Implementations must be deterministic; the scorer clamps whatever they return.
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &'static str;

    fn polarity_subjectivity(&self, text: &str) -> (f64, f64);
}

/// Selectable sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentimentModelKind {
    #[default]
    Vader,
    VaderFinance,
}

impl SentimentModelKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vader => "vader",
            Self::VaderFinance => "vader-finance",
        }
    }

    pub fn build(self) -> Arc<dyn SentimentModel> {
        match self {
            Self::Vader => Arc::new(VaderModel::new()),
            Self::VaderFinance => Arc::new(VaderModel::finance()),
        }
    }
}

impl Display for SentimentModelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentModelKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vader" => Ok(Self::Vader),
            "vader-finance" | "finance" => Ok(Self::VaderFinance),
            other => Err(ValidationError::InvalidSentimentModel {
                value: other.to_owned(),
            }),
        }
    }
}

/// Scores text with a shared model.
#[derive(Clone)]
pub struct SentimentScorer {
    model: Arc<dyn SentimentModel>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::from_kind(SentimentModelKind::default())
    }
}

impl SentimentScorer {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self { model }
    }

    pub fn from_kind(kind: SentimentModelKind) -> Self {
        Self::new(kind.build())
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Blank text scores `(0.0, 0.0, Neutral)` without consulting the model.
    pub fn score(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }
        let (polarity, subjectivity) = self.model.polarity_subjectivity(text);
        SentimentResult::new(polarity, subjectivity)
    }

    /// Scores a headline's title and summary joined by a space.
    pub fn score_headline(&self, headline: &Headline) -> SentimentResult {
        self.score(&headline.scoring_text())
    }
}
