use vader_sentiment::SentimentIntensityAnalyzer;

use super::SentimentModel;

/// Market jargon the general VADER lexicon under-weights.
const BULLISH_TERMS: &[(&str, f64)] = &[
    ("surge", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("soar", 0.5),
    ("bullish", 0.5),
    ("record high", 0.4),
    ("all-time high", 0.5),
    ("beats estimates", 0.4),
    ("upgrade", 0.3),
    ("outperform", 0.3),
    ("buyback", 0.2),
    ("breakthrough", 0.4),
    ("raises guidance", 0.4),
];

const BEARISH_TERMS: &[(&str, f64)] = &[
    ("crash", -0.5),
    ("plunge", -0.5),
    ("tumble", -0.4),
    ("slump", -0.4),
    ("bearish", -0.5),
    ("collapse", -0.5),
    ("downgrade", -0.3),
    ("misses estimates", -0.4),
    ("cuts guidance", -0.4),
    ("lawsuit", -0.4),
    ("recall", -0.3),
    ("bankruptcy", -0.6),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("hack", -0.5),
    ("breach", -0.4),
    ("fraud", -0.5),
    ("layoffs", -0.3),
];

/// Share of the keyword boost added to the compound score.
const BOOST_WEIGHT: f64 = 0.5;

/// VADER rule-based model.
///
/// Polarity is the compound score. VADER has no subjectivity measure, so the share of
/// text that is not neutral (`1 - neu`) stands in for it.
///
/// With [`VaderModel::finance`] a keyword boost for market terms is added on top of the
/// compound score before clamping.
pub struct VaderModel {
    analyzer: SentimentIntensityAnalyzer<'static>,
    finance_terms: bool,
}

impl Default for VaderModel {
    fn default() -> Self {
        Self::new()
    }
}

impl VaderModel {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
            finance_terms: false,
        }
    }

    pub fn finance() -> Self {
        Self {
            finance_terms: true,
            ..Self::new()
        }
    }

    fn finance_boost(text: &str) -> f64 {
        let lowered = text.to_lowercase();
        BULLISH_TERMS
            .iter()
            .chain(BEARISH_TERMS)
            .filter(|(term, _)| lowered.contains(term))
            .map(|(_, weight)| weight)
            .sum()
    }
}

impl SentimentModel for VaderModel {
    fn name(&self) -> &'static str {
        if self.finance_terms {
            "vader-finance"
        } else {
            "vader"
        }
    }

    fn polarity_subjectivity(&self, text: &str) -> (f64, f64) {
        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        let neutral = scores.get("neu").copied().unwrap_or(1.0);
        let polarity = if self.finance_terms {
            (compound + Self::finance_boost(text) * BOOST_WEIGHT).clamp(-1.0, 1.0)
        } else {
            compound
        };
        (polarity, 1.0 - neutral)
    }
}
