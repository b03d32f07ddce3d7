//! Cached price-history and issuer-metadata fetching.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheMode, Lookup, TtlCache};
use crate::data_source::{HistoryRequest, MarketDataSource};
use crate::{IssuerInfo, Period, PriceHistory, ProviderId, Symbol};

/// Price history together with issuer metadata for one symbol and window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub history: PriceHistory,
    pub issuer: IssuerInfo,
    /// Non-fatal problems met while assembling the snapshot.
    pub warnings: Vec<String>,
}

/// Outcome of a market-data fetch.
///
/// Every failure cause (transport error, rejected symbol, empty series) collapses into
/// `Unavailable`; the reason is kept for logs and the user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketData {
    Available(MarketSnapshot),
    Unavailable { reason: String },
}

impl MarketData {
    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        match self {
            Self::Available(snapshot) => Some(snapshot),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Fetches market data through a [`MarketDataSource`], memoizing every outcome per
/// (symbol, period).
#[derive(Clone)]
pub struct MarketDataFetcher {
    source: Arc<dyn MarketDataSource>,
    cache: TtlCache<MarketData>,
}

impl MarketDataFetcher {
    pub fn new(source: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn provider(&self) -> ProviderId {
        self.source.id()
    }

    pub async fn fetch(&self, symbol: &Symbol, period: Period) -> Lookup<MarketData> {
        self.fetch_with_mode(symbol, period, CacheMode::Use).await
    }

    /// Unavailable outcomes are cached like snapshots; a bad symbol is not retried upstream
    /// until the entry expires or the cache is cleared.
    pub async fn fetch_with_mode(
        &self,
        symbol: &Symbol,
        period: Period,
        mode: CacheMode,
    ) -> Lookup<MarketData> {
        let key = format!("{symbol}|{period}");
        let lookup = self
            .cache
            .get_or_fill(&key, mode, || self.fetch_upstream(symbol, period))
            .await;

        if lookup.cache_hit {
            tracing::debug!(%symbol, %period, "market data cache hit");
        }
        lookup
    }

    /// Drops every memoized snapshot.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    async fn fetch_upstream(&self, symbol: &Symbol, period: Period) -> MarketData {
        let provider = self.source.id();
        let request = HistoryRequest::new(symbol.clone(), period);

        let series = match self.source.history(request).await {
            Ok(series) => series,
            Err(error) => {
                tracing::warn!(%symbol, %period, %provider, %error, "price history fetch failed");
                return MarketData::Unavailable {
                    reason: error.to_string(),
                };
            }
        };

        if series.history.is_empty() {
            tracing::warn!(%symbol, %period, %provider, "price history is empty");
            return MarketData::Unavailable {
                reason: format!("{provider} returned no price data for {symbol} ({period})"),
            };
        }

        let mut warnings = Vec::new();
        let issuer = match self.source.issuer_info(symbol).await {
            Ok(mut issuer) => {
                for (field, value) in series.meta.fields() {
                    if issuer.get(field).is_none() {
                        issuer.insert(field, value.clone());
                    }
                }
                issuer
            }
            Err(error) => {
                tracing::warn!(%symbol, %provider, %error, "issuer metadata fetch failed");
                warnings.push(format!("issuer metadata unavailable: {}", error.message()));
                series.meta
            }
        };

        tracing::info!(%symbol, %period, points = series.history.len(), "market data fetched");
        MarketData::Available(MarketSnapshot {
            history: series.history,
            issuer,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::data_source::{ChartSeries, SourceError, SourceFuture};
    use crate::{PricePoint, UtcDateTime};

    struct StubSource {
        points: usize,
        issuer_fails: bool,
        history_calls: AtomicUsize,
    }

    impl StubSource {
        fn new(points: usize, issuer_fails: bool) -> Arc<Self> {
            Arc::new(Self {
                points,
                issuer_fails,
                history_calls: AtomicUsize::new(0),
            })
        }
    }

    impl MarketDataSource for StubSource {
        fn id(&self) -> ProviderId {
            ProviderId::Yahoo
        }

        fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, ChartSeries> {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            let points = (0..self.points)
                .map(|day| {
                    let date = UtcDateTime::from_unix_timestamp(1_704_153_600 + day as i64 * 86_400)
                        .expect("in range");
                    PricePoint::new(date, 10.0, 11.0, 9.0, 10.5, 1_000).expect("valid")
                })
                .collect();
            let mut meta = IssuerInfo::new();
            meta.insert("longName", json!("Chart Name"));
            meta.insert("currency", json!("USD"));
            Box::pin(async move {
                Ok(ChartSeries {
                    history: PriceHistory::new(req.symbol, req.period, points),
                    meta,
                })
            })
        }

        fn issuer_info<'a>(&'a self, _symbol: &'a Symbol) -> SourceFuture<'a, IssuerInfo> {
            let fails = self.issuer_fails;
            Box::pin(async move {
                if fails {
                    return Err(SourceError::unavailable("quoteSummary down"));
                }
                let mut info = IssuerInfo::new();
                info.insert("marketCap", json!(3.0e12));
                info.insert("longName", json!("Summary Name"));
                Ok(info)
            })
        }
    }

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("symbol")
    }

    #[tokio::test]
    async fn empty_series_is_unavailable_and_cached_until_clear() {
        let source = StubSource::new(0, false);
        let fetcher = MarketDataFetcher::new(source.clone(), Duration::from_secs(300));

        let first = fetcher.fetch(&symbol(), Period::OneMonth).await;
        assert!(matches!(first.value, MarketData::Unavailable { .. }));
        assert!(!first.cache_hit);

        let second = fetcher.fetch(&symbol(), Period::OneMonth).await;
        assert_eq!(second.value, first.value);
        assert!(second.cache_hit);
        assert_eq!(source.history_calls.load(Ordering::SeqCst), 1);

        fetcher.clear().await;
        let third = fetcher.fetch(&symbol(), Period::OneMonth).await;
        assert!(!third.cache_hit);
        assert_eq!(source.history_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn summary_fields_win_over_chart_meta() {
        let fetcher = MarketDataFetcher::new(StubSource::new(3, false), Duration::from_secs(300));

        let lookup = fetcher.fetch(&symbol(), Period::OneMonth).await;
        let snapshot = lookup.value.snapshot().expect("available");

        assert_eq!(snapshot.issuer.long_name(), Some("Summary Name"));
        assert_eq!(snapshot.issuer.currency(), Some("USD"));
        assert_eq!(snapshot.issuer.market_cap(), Some(3.0e12));
        assert!(snapshot.warnings.is_empty());
    }

    #[tokio::test]
    async fn failed_issuer_call_falls_back_to_chart_meta_with_warning() {
        let fetcher = MarketDataFetcher::new(StubSource::new(3, true), Duration::from_secs(300));

        let lookup = fetcher.fetch(&symbol(), Period::OneMonth).await;
        let snapshot = lookup.value.snapshot().expect("still available");

        assert_eq!(snapshot.issuer.long_name(), Some("Chart Name"));
        assert_eq!(snapshot.issuer.market_cap(), None);
        assert_eq!(snapshot.warnings.len(), 1);
        assert!(snapshot.warnings[0].contains("quoteSummary down"));
    }

    #[tokio::test]
    async fn cache_key_includes_period() {
        let source = StubSource::new(2, false);
        let fetcher = MarketDataFetcher::new(source.clone(), Duration::from_secs(300));

        fetcher.fetch(&symbol(), Period::OneMonth).await;
        let same = fetcher.fetch(&symbol(), Period::OneMonth).await;
        let other = fetcher.fetch(&symbol(), Period::FiveDays).await;

        assert!(same.cache_hit);
        assert!(!other.cache_hit);
        assert_eq!(source.history_calls.load(Ordering::SeqCst), 2);
    }
}
