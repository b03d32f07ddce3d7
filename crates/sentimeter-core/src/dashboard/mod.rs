//! # Dashboard pipeline
//!
//! One fetch cycle runs the market and news fetchers together, scores the headlines, and
//! folds everything into a [`DashboardReport`] that the terminal and browser front ends
//! render without further computation.
//!
//! ```text
//! symbol, period ─┬─▶ MarketDataFetcher ─▶ PricePanel ────────────┐
//!                 └─▶ NewsFetcher ─▶ SentimentScorer ─▶ SentimentView ─┴─▶ DashboardReport
//! ```
//!
//! An unusable symbol or missing price data short-circuits to [`MarketPanel::Unavailable`];
//! the sentiment section is then omitted entirely.

pub mod format;
pub mod view;

use serde::Serialize;
use serde_json::Value;

pub use view::{
    label_color, ChartPoint, GaugeBand, HeadlineRow, PieSlice, PriceChart, PriceMetrics,
    PricePanel, SentimentGauge, SentimentOverview, SentimentView, TimelinePoint,
};

use crate::cache::CacheMode;
use crate::market::{MarketData, MarketDataFetcher};
use crate::news::NewsFetcher;
use crate::sentiment::SentimentScorer;
use crate::{Period, ProviderId, Symbol, UtcDateTime};

pub const DASHBOARD_TITLE: &str = "📈 Real-Time Stock Market Sentiment Analysis";

pub const NO_NEWS_WARNING: &str = "No news headlines could be fetched for sentiment analysis. \
Try changing the stock symbol or check your internet connection.";

pub const DISCLAIMER: &str = "Sentiment scores come from lexicon-based analysis of news \
headlines; price data comes from Yahoo Finance. This analysis should be used as \
supplementary information and not as the sole basis for investment decisions.";

/// Blocking message shown when no price data could be obtained.
pub fn unavailable_message(symbol: &str) -> String {
    format!(
        "Could not fetch data for {symbol}. Please check the stock symbol or try a different \
analysis period."
    )
}

/// Price section of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketPanel {
    Ready(Box<PricePanel>),
    Unavailable {
        message: String,
        reason: String,
        /// What the provider handed back, shown beneath the message.
        raw: Value,
    },
}

/// Sentiment section of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SentimentPanel {
    Analyzed(Box<SentimentView>),
    NoNews { warning: String },
}

/// Result of one fetch cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// Normalized ticker, or the trimmed upper-cased input when it failed to parse.
    pub symbol: String,
    pub period: Period,
    pub model: &'static str,
    pub generated_at: UtcDateTime,
    /// True only when both market data and news came from the cache.
    pub cache_hit: bool,
    pub source_chain: Vec<ProviderId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub market: MarketPanel,
    /// Absent when the market panel is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentPanel>,
}

impl DashboardReport {
    pub fn is_unavailable(&self) -> bool {
        matches!(self.market, MarketPanel::Unavailable { .. })
    }

    pub fn price_panel(&self) -> Option<&PricePanel> {
        match &self.market {
            MarketPanel::Ready(panel) => Some(panel),
            MarketPanel::Unavailable { .. } => None,
        }
    }

    pub fn sentiment_view(&self) -> Option<&SentimentView> {
        match &self.sentiment {
            Some(SentimentPanel::Analyzed(view)) => Some(view),
            _ => None,
        }
    }
}

/// Runs fetch cycles against shared, cached fetchers.
#[derive(Clone)]
pub struct DashboardService {
    market: MarketDataFetcher,
    news: NewsFetcher,
    scorer: SentimentScorer,
}

impl DashboardService {
    pub fn new(market: MarketDataFetcher, news: NewsFetcher, scorer: SentimentScorer) -> Self {
        Self {
            market,
            news,
            scorer,
        }
    }

    pub fn market(&self) -> &MarketDataFetcher {
        &self.market
    }

    pub fn news(&self) -> &NewsFetcher {
        &self.news
    }

    pub fn scorer(&self) -> &SentimentScorer {
        &self.scorer
    }

    pub async fn run(&self, symbol_input: &str, period: Period) -> DashboardReport {
        self.run_with_mode(symbol_input, period, CacheMode::Use).await
    }

    /// Clears every cache, then runs a fresh cycle.
    pub async fn refresh(&self, symbol_input: &str, period: Period) -> DashboardReport {
        self.clear().await;
        self.run(symbol_input, period).await
    }

    pub async fn clear(&self) {
        tokio::join!(self.market.clear(), self.news.clear());
        tracing::info!("dashboard caches cleared");
    }

    pub async fn run_with_mode(
        &self,
        symbol_input: &str,
        period: Period,
        mode: CacheMode,
    ) -> DashboardReport {
        let symbol = match Symbol::parse(symbol_input) {
            Ok(symbol) => symbol,
            Err(error) => {
                let shown = symbol_input.trim().to_uppercase();
                tracing::warn!(symbol = %shown, %error, "rejected symbol input");
                return self.unavailable_report(shown, period, error.to_string(), false);
            }
        };

        let (market, news) = tokio::join!(
            self.market.fetch_with_mode(&symbol, period, mode),
            self.news.fetch_with_mode(&symbol, mode),
        );

        let snapshot = match market.value {
            MarketData::Available(snapshot) => snapshot,
            MarketData::Unavailable { reason } => {
                tracing::warn!(%symbol, %period, %reason, "market data unavailable");
                return self.unavailable_report(symbol.to_string(), period, reason, market.cache_hit);
            }
        };

        let Some(panel) = PricePanel::from_snapshot(&snapshot) else {
            return self.unavailable_report(
                symbol.to_string(),
                period,
                String::from("price history is empty"),
                market.cache_hit,
            );
        };

        let feed = news.value;
        let mut source_chain = vec![self.market.provider()];
        if let Some(provider) = feed.provider {
            if !source_chain.contains(&provider) {
                source_chain.push(provider);
            }
        }

        let mut warnings = snapshot.warnings.clone();
        warnings.extend(feed.warnings.iter().cloned());

        let sentiment = match SentimentView::from_feed(&feed, &self.scorer) {
            Some(view) => SentimentPanel::Analyzed(Box::new(view)),
            None => {
                tracing::info!(%symbol, headlines = feed.headlines.len(), "no scorable headlines");
                SentimentPanel::NoNews {
                    warning: String::from(NO_NEWS_WARNING),
                }
            }
        };

        tracing::info!(
            %symbol,
            %period,
            points = snapshot.history.len(),
            headlines = feed.headlines.len(),
            cache_hit = market.cache_hit && news.cache_hit,
            "dashboard cycle complete"
        );

        DashboardReport {
            symbol: symbol.to_string(),
            period,
            model: self.scorer.model_name(),
            generated_at: UtcDateTime::now(),
            cache_hit: market.cache_hit && news.cache_hit,
            source_chain,
            warnings,
            market: MarketPanel::Ready(Box::new(panel)),
            sentiment: Some(sentiment),
        }
    }

    fn unavailable_report(
        &self,
        symbol: String,
        period: Period,
        reason: String,
        cache_hit: bool,
    ) -> DashboardReport {
        DashboardReport {
            market: MarketPanel::Unavailable {
                message: unavailable_message(&symbol),
                reason,
                raw: Value::Array(Vec::new()),
            },
            symbol,
            period,
            model: self.scorer.model_name(),
            generated_at: UtcDateTime::now(),
            cache_hit,
            source_chain: vec![self.market.provider()],
            warnings: Vec::new(),
            sentiment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DashboardConfig;

    #[tokio::test]
    async fn rejected_symbol_reports_trimmed_uppercase_input() {
        let service = DashboardConfig::default().with_mock(true).build_service();

        let report = service.run("  1bad ", Period::SixMonths).await;

        assert!(report.is_unavailable());
        assert_eq!(report.symbol, "1BAD");
        assert!(!report.cache_hit);
        assert!(report.sentiment.is_none());
        match &report.market {
            MarketPanel::Unavailable { message, reason, .. } => {
                assert_eq!(message, &unavailable_message("1BAD"));
                assert!(!reason.is_empty());
            }
            MarketPanel::Ready(_) => panic!("expected unavailable panel"),
        }
    }
}
