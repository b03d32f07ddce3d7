//! Presentation-ready panels built from fetched market data and scored headlines.

use serde::Serialize;

use super::format::{
    format_delta, format_market_cap, format_price, format_score, format_volume, price_change,
    truncate_title,
};
use crate::market::MarketSnapshot;
use crate::news::NewsFeed;
use crate::sentiment::{AggregateSentiment, SentimentLabel, SentimentResult, SentimentScorer};
use crate::{Headline, UtcDateTime};

pub const POSITIVE_COLOR: &str = "green";
pub const NEGATIVE_COLOR: &str = "red";
pub const NEUTRAL_COLOR: &str = "gray";

/// Chart color for a sentiment label.
pub const fn label_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => POSITIVE_COLOR,
        SentimentLabel::Negative => NEGATIVE_COLOR,
        SentimentLabel::Neutral => NEUTRAL_COLOR,
    }
}

/// Headline figures for the latest trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMetrics {
    /// `"{SYMBOL} Stock Price"`
    pub title: String,
    pub close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub price: String,
    pub delta: String,
    /// `None` when the provider returned no issuer metadata at all.
    pub market_cap: Option<String>,
    pub volume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: UtcDateTime,
    /// `YYYY-MM-DD`
    pub label: String,
    pub close: f64,
}

/// Close-price line series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    pub points: Vec<ChartPoint>,
}

impl PriceChart {
    /// Lowest and highest close, or `None` for an empty series.
    pub fn close_range(&self) -> Option<(f64, f64)> {
        let mut closes = self.points.iter().map(|point| point.close);
        let first = closes.next()?;
        Some(closes.fold((first, first), |(low, high), close| {
            (low.min(close), high.max(close))
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePanel {
    pub company_name: Option<String>,
    pub currency: Option<String>,
    pub metrics: PriceMetrics,
    pub chart: PriceChart,
}

impl PricePanel {
    /// Builds the panel; `None` only when the history has no points.
    pub fn from_snapshot(snapshot: &MarketSnapshot) -> Option<Self> {
        let history = &snapshot.history;
        let latest = history.latest()?;
        let previous_close = history.previous().map_or(latest.close, |point| point.close);
        let (change, change_percent) = price_change(latest.close, previous_close);
        let symbol = history.symbol.as_str();

        let market_cap = if snapshot.issuer.is_empty() {
            None
        } else {
            Some(format_market_cap(snapshot.issuer.market_cap()))
        };

        let metrics = PriceMetrics {
            title: format!("{symbol} Stock Price"),
            close: latest.close,
            change,
            change_percent,
            price: format_price(latest.close),
            delta: format_delta(change, change_percent),
            market_cap,
            volume: format_volume(latest.volume),
        };

        let chart = PriceChart {
            title: format!("{symbol} Stock Price Over Time"),
            points: history
                .points
                .iter()
                .map(|point| ChartPoint {
                    date: point.date,
                    label: point.date.format_date(),
                    close: point.close,
                })
                .collect(),
        };

        Some(Self {
            company_name: snapshot.issuer.long_name().map(str::to_owned),
            currency: snapshot.issuer.currency().map(str::to_owned),
            metrics,
            chart,
        })
    }
}

/// Colored range on the gauge axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBand {
    pub from: f64,
    pub to: f64,
    pub color: &'static str,
}

pub const GAUGE_MIN: f64 = -100.0;
pub const GAUGE_MAX: f64 = 100.0;
pub const GAUGE_THRESHOLD: f64 = 90.0;
pub const GAUGE_BANDS: [GaugeBand; 3] = [
    GaugeBand {
        from: -100.0,
        to: -20.0,
        color: NEGATIVE_COLOR,
    },
    GaugeBand {
        from: -20.0,
        to: 20.0,
        color: "yellow",
    },
    GaugeBand {
        from: 20.0,
        to: 100.0,
        color: POSITIVE_COLOR,
    },
];

/// Mean polarity scaled to the `[-100, 100]` gauge axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentGauge {
    pub title: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    /// Delta is shown relative to this value.
    pub reference: f64,
    pub threshold: f64,
    pub bands: [GaugeBand; 3],
}

impl SentimentGauge {
    pub fn new(mean_polarity: f64) -> Self {
        Self {
            title: "Sentiment Score",
            value: (mean_polarity * 100.0).clamp(GAUGE_MIN, GAUGE_MAX),
            min: GAUGE_MIN,
            max: GAUGE_MAX,
            reference: 0.0,
            threshold: GAUGE_THRESHOLD,
            bands: GAUGE_BANDS,
        }
    }

    /// Band the needle falls in. Both ±20 belong to the middle band.
    pub fn band(&self) -> &GaugeBand {
        if self.value < -20.0 {
            &self.bands[0]
        } else if self.value > 20.0 {
            &self.bands[2]
        } else {
            &self.bands[1]
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: SentimentLabel,
    pub count: usize,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentOverview {
    pub label: SentimentLabel,
    pub score: String,
    pub subjectivity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineRow {
    pub title: String,
    pub label: SentimentLabel,
    pub polarity: f64,
    pub score: String,
    pub source: String,
    pub published: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// 1-based position in the feed.
    pub article_number: usize,
    pub published: String,
    pub published_at: Option<UtcDateTime>,
    pub polarity: f64,
    pub label: SentimentLabel,
}

/// Everything derived from scoring one news feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentView {
    pub aggregate: AggregateSentiment,
    pub overview: SentimentOverview,
    pub gauge: SentimentGauge,
    pub distribution: Vec<PieSlice>,
    pub headlines: Vec<HeadlineRow>,
    pub timeline: Vec<TimelinePoint>,
}

impl SentimentView {
    /// Scores every headline in the feed. `None` when no headline has a title.
    pub fn from_feed(feed: &NewsFeed, scorer: &SentimentScorer) -> Option<Self> {
        if !feed.has_titles() {
            return None;
        }

        let results: Vec<SentimentResult> = feed
            .headlines
            .iter()
            .map(|headline| scorer.score_headline(headline))
            .collect();
        let aggregate = AggregateSentiment::from_results(&results)?;

        Some(Self::assemble(&feed.headlines, &results, aggregate))
    }

    fn assemble(
        headlines: &[Headline],
        results: &[SentimentResult],
        aggregate: AggregateSentiment,
    ) -> Self {
        let overview = SentimentOverview {
            label: aggregate.label,
            score: format_score(aggregate.mean_polarity),
            subjectivity: format_score(aggregate.mean_subjectivity),
        };

        let distribution = aggregate
            .distribution
            .present()
            .map(|(label, count)| PieSlice {
                label,
                count,
                color: label_color(label),
            })
            .collect();

        let rows = headlines
            .iter()
            .zip(results)
            .map(|(headline, result)| HeadlineRow {
                title: truncate_title(&headline.title),
                label: result.label,
                polarity: result.polarity,
                score: format_score(result.polarity),
                source: headline.source.clone(),
                published: headline.published.clone(),
            })
            .collect();

        let timeline = headlines
            .iter()
            .zip(results)
            .enumerate()
            .map(|(index, (headline, result))| TimelinePoint {
                article_number: index + 1,
                published: headline.published.clone(),
                published_at: headline.published_at,
                polarity: result.polarity,
                label: result.label,
            })
            .collect();

        Self {
            gauge: SentimentGauge::new(aggregate.mean_polarity),
            aggregate,
            overview,
            distribution,
            headlines: rows,
            timeline,
        }
    }
}
