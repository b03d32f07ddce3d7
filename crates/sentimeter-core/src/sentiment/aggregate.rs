use serde::{Deserialize, Serialize};

use super::{classify, SentimentLabel, SentimentResult};

/// Number of results per label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelDistribution {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }

    pub const fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub const fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Labels with at least one result, in `SentimentLabel::ALL` order.
    pub fn present(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL
            .into_iter()
            .map(|label| (label, self.count(label)))
            .filter(|(_, count)| *count > 0)
    }
}

/// Summary over a batch of headline scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateSentiment {
    pub mean_polarity: f64,
    pub mean_subjectivity: f64,
    pub distribution: LabelDistribution,
    /// Label of the mean polarity, using the per-headline thresholds.
    pub label: SentimentLabel,
}

impl AggregateSentiment {
    /// Returns `None` for an empty batch; there is no meaningful mean to report.
    pub fn from_results(results: &[SentimentResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let count = results.len() as f64;
        let mut distribution = LabelDistribution::default();
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        for result in results {
            distribution.record(result.label);
            polarity_sum += result.polarity;
            subjectivity_sum += result.subjectivity;
        }

        let mean_polarity = polarity_sum / count;
        Some(Self {
            mean_polarity,
            mean_subjectivity: subjectivity_sum / count,
            distribution,
            label: classify(mean_polarity),
        })
    }

    pub const fn count(&self) -> usize {
        self.distribution.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_has_no_aggregate() {
        assert!(AggregateSentiment::from_results(&[]).is_none());
    }

    #[test]
    fn balanced_batch_is_neutral() {
        let results = [
            SentimentResult::new(0.5, 0.6),
            SentimentResult::new(-0.5, 0.4),
            SentimentResult::new(0.0, 0.2),
        ];

        let aggregate = AggregateSentiment::from_results(&results).expect("non-empty");

        assert_eq!(aggregate.mean_polarity, 0.0);
        assert!((aggregate.mean_subjectivity - 0.4).abs() < 1e-12);
        assert_eq!(aggregate.label, SentimentLabel::Neutral);
        assert_eq!(aggregate.distribution.positive, 1);
        assert_eq!(aggregate.distribution.negative, 1);
        assert_eq!(aggregate.distribution.neutral, 1);
        assert_eq!(aggregate.count(), 3);
    }

    #[test]
    fn overall_label_uses_mean_not_majority() {
        let results = [
            SentimentResult::new(0.05, 0.1),
            SentimentResult::new(0.05, 0.1),
            SentimentResult::new(0.9, 0.9),
        ];

        let aggregate = AggregateSentiment::from_results(&results).expect("non-empty");

        assert_eq!(aggregate.distribution.neutral, 2);
        assert_eq!(aggregate.label, SentimentLabel::Positive);
    }

    #[test]
    fn present_skips_empty_labels() {
        let mut distribution = LabelDistribution::default();
        distribution.record(SentimentLabel::Negative);
        distribution.record(SentimentLabel::Negative);

        let present: Vec<_> = distribution.present().collect();
        assert_eq!(present, vec![(SentimentLabel::Negative, 2)]);
    }
}
