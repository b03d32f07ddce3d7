use sentimeter_core::sentiment::{classify, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD};
use sentimeter_core::{
    AggregateSentiment, SentimentLabel, SentimentModelKind, SentimentResult, SentimentScorer,
};

mod support;

#[test]
fn thresholds_are_exclusive() {
    assert_eq!(classify(POSITIVE_THRESHOLD), SentimentLabel::Neutral);
    assert_eq!(classify(NEGATIVE_THRESHOLD), SentimentLabel::Neutral);
    assert_eq!(classify(0.1001), SentimentLabel::Positive);
    assert_eq!(classify(-0.1001), SentimentLabel::Negative);
    assert_eq!(classify(0.0), SentimentLabel::Neutral);
}

#[test]
fn blank_text_is_neutral_for_every_model() {
    for kind in [SentimentModelKind::Vader, SentimentModelKind::VaderFinance] {
        let scorer = SentimentScorer::from_kind(kind);
        for text in ["", "   ", "\n\t"] {
            let result = scorer.score(text);
            assert_eq!(result, SentimentResult::neutral(), "{kind} on {text:?}");
        }
    }
}

#[test]
fn default_model_separates_opinionated_headlines() {
    let scorer = SentimentScorer::default();

    let upbeat = scorer.score("Company reports excellent results");
    let gloomy = scorer.score("Company reports terrible results");
    let factual = scorer.score("Shareholder meeting scheduled for Tuesday");

    assert_eq!(upbeat.label, SentimentLabel::Positive);
    assert_eq!(gloomy.label, SentimentLabel::Negative);
    assert_eq!(factual.label, SentimentLabel::Neutral);
    assert!(factual.polarity.abs() <= 0.1);
    assert!(upbeat.subjectivity > factual.subjectivity);
}

#[test]
fn default_model_reads_plain_negative_english() {
    let scorer = SentimentScorer::default();
    assert_eq!(scorer.model_name(), "vader");

    for text in [
        "Markets collapse in devastating disaster",
        "Customers hate the ugly redesign after hack",
    ] {
        let result = scorer.score(text);
        assert_eq!(result.label, SentimentLabel::Negative, "{text}: {result:?}");
        assert!(result.subjectivity > 0.0);
    }
}

#[test]
fn finance_model_leans_further_on_market_terms() {
    let plain = SentimentScorer::default();
    let finance = SentimentScorer::from_kind(SentimentModelKind::VaderFinance);
    let text = "Shares tumble on downgrade and lawsuit";

    assert!(finance.score(text).polarity < plain.score(text).polarity);
    assert_eq!(finance.score(text).label, SentimentLabel::Negative);
}

#[test]
fn headline_scoring_reads_title_and_summary() {
    let scorer = SentimentScorer::default();

    let title_only = scorer.score_headline(&support::headline("Quarterly update", ""));
    let with_summary =
        scorer.score_headline(&support::headline("Quarterly update", "Analysts call it terrible"));

    assert_eq!(title_only.label, SentimentLabel::Neutral);
    assert_eq!(with_summary.label, SentimentLabel::Negative);
}

#[test]
fn scores_stay_in_range_and_are_repeatable() {
    let text = "extremely excellent extremely impressive best stellar record";
    for kind in [SentimentModelKind::Vader, SentimentModelKind::VaderFinance] {
        let scorer = SentimentScorer::from_kind(kind);
        let first = scorer.score(text);
        let second = scorer.score(text);

        assert_eq!(first, second);
        assert!((-1.0..=1.0).contains(&first.polarity));
        assert!((0.0..=1.0).contains(&first.subjectivity));
        assert_eq!(first.label, SentimentLabel::Positive);
    }
}

#[test]
fn aggregate_of_opposites_is_neutral() {
    let results = [
        SentimentResult::new(0.5, 0.5),
        SentimentResult::new(-0.5, 0.5),
        SentimentResult::new(0.0, 0.0),
    ];

    let aggregate = AggregateSentiment::from_results(&results).expect("non-empty batch");

    assert_eq!(aggregate.label, SentimentLabel::Neutral);
    assert_eq!(aggregate.count(), 3);
    assert_eq!(
        aggregate.distribution.present().collect::<Vec<_>>(),
        vec![
            (SentimentLabel::Positive, 1),
            (SentimentLabel::Negative, 1),
            (SentimentLabel::Neutral, 1),
        ]
    );
}

#[test]
fn aggregate_label_follows_mean_not_majority() {
    let results = [
        SentimentResult::new(0.15, 0.4),
        SentimentResult::new(0.15, 0.4),
        SentimentResult::new(-0.9, 0.9),
    ];

    let aggregate = AggregateSentiment::from_results(&results).expect("non-empty batch");

    assert_eq!(aggregate.distribution.positive, 2);
    assert_eq!(aggregate.label, SentimentLabel::Negative);
}

#[test]
fn model_names_round_trip_through_parsing() {
    for kind in [SentimentModelKind::Vader, SentimentModelKind::VaderFinance] {
        let parsed: SentimentModelKind = kind.as_str().parse().expect("known model");
        assert_eq!(parsed, kind);
        assert_eq!(SentimentScorer::from_kind(kind).model_name(), kind.as_str());
    }
    assert!("textblob".parse::<SentimentModelKind>().is_err());
}
