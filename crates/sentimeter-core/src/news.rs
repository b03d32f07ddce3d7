//! Cached headline fetching with a primary source and a fallback source.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::cache::{CacheMode, Lookup, TtlCache};
use crate::data_source::{NewsRequest, NewsSource, SourceError, SourceErrorKind};
use crate::{Headline, ProviderId, Symbol};

/// Maximum headlines requested from either source.
pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// Headlines for one symbol and where they came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewsFeed {
    pub headlines: Vec<Headline>,
    /// Source that supplied the headlines; `None` when both sources came up empty.
    pub provider: Option<ProviderId>,
    /// Why the primary (and possibly the fallback) source was skipped.
    pub warnings: Vec<String>,
}

impl NewsFeed {
    pub fn is_empty(&self) -> bool {
        self.headlines.is_empty()
    }

    /// True when at least one headline has a non-blank title.
    pub fn has_titles(&self) -> bool {
        self.headlines.iter().any(Headline::has_title)
    }
}

/// Outcome of one source attempt.
enum Attempt {
    Found(Vec<Headline>),
    Empty,
    Failed(SourceError),
}

/// Fetches headlines from `primary`, consulting `fallback` only when the primary
/// errors or returns nothing. Feeds are memoized per symbol, empty ones included.
#[derive(Clone)]
pub struct NewsFetcher {
    primary: Arc<dyn NewsSource>,
    fallback: Arc<dyn NewsSource>,
    cache: TtlCache<NewsFeed>,
    limit: usize,
}

impl NewsFetcher {
    pub fn new(
        primary: Arc<dyn NewsSource>,
        fallback: Arc<dyn NewsSource>,
        ttl: Duration,
        limit: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            cache: TtlCache::new(ttl),
            limit: limit.max(1),
        }
    }

    pub fn providers(&self) -> [ProviderId; 2] {
        [self.primary.id(), self.fallback.id()]
    }

    pub async fn fetch(&self, symbol: &Symbol) -> Lookup<NewsFeed> {
        self.fetch_with_mode(symbol, CacheMode::Use).await
    }

    pub async fn fetch_with_mode(&self, symbol: &Symbol, mode: CacheMode) -> Lookup<NewsFeed> {
        let lookup = self
            .cache
            .get_or_fill(symbol.as_str(), mode, || self.fetch_upstream(symbol))
            .await;

        if lookup.cache_hit {
            tracing::debug!(%symbol, "news cache hit");
        }
        lookup
    }

    /// Drops every memoized feed.
    pub async fn clear(&self) {
        self.cache.clear().await;
    }

    async fn fetch_upstream(&self, symbol: &Symbol) -> NewsFeed {
        let mut warnings = Vec::new();

        match self.attempt(self.primary.as_ref(), symbol).await {
            Attempt::Found(headlines) => {
                return self.feed(symbol, self.primary.id(), headlines, warnings);
            }
            Attempt::Empty => {
                warnings.push(format!("{} returned no articles", self.primary.id()));
            }
            Attempt::Failed(error) => warnings.push(error.to_string()),
        }

        tracing::info!(%symbol, provider = %self.fallback.id(), "falling back to secondary news source");

        match self.attempt(self.fallback.as_ref(), symbol).await {
            Attempt::Found(headlines) => self.feed(symbol, self.fallback.id(), headlines, warnings),
            Attempt::Empty => {
                warnings.push(format!("{} returned no articles", self.fallback.id()));
                NewsFeed {
                    headlines: Vec::new(),
                    provider: None,
                    warnings,
                }
            }
            Attempt::Failed(error) => {
                warnings.push(error.to_string());
                NewsFeed {
                    headlines: Vec::new(),
                    provider: None,
                    warnings,
                }
            }
        }
    }

    async fn attempt(&self, source: &dyn NewsSource, symbol: &Symbol) -> Attempt {
        let provider = source.id();
        let request = match NewsRequest::new(symbol.clone(), self.limit) {
            Ok(request) => request,
            Err(error) => return Attempt::Failed(error),
        };

        match source.headlines(request).await {
            Ok(headlines) if headlines.is_empty() => Attempt::Empty,
            Ok(mut headlines) => {
                headlines.truncate(self.limit);
                Attempt::Found(headlines)
            }
            Err(error) if error.kind() == SourceErrorKind::NotConfigured => {
                tracing::info!(%symbol, %provider, %error, "news source skipped");
                Attempt::Failed(error)
            }
            Err(error) => {
                tracing::warn!(%symbol, %provider, %error, "news fetch failed");
                Attempt::Failed(error)
            }
        }
    }

    fn feed(
        &self,
        symbol: &Symbol,
        provider: ProviderId,
        headlines: Vec<Headline>,
        warnings: Vec<String>,
    ) -> NewsFeed {
        tracing::info!(%symbol, %provider, count = headlines.len(), "news fetched");
        NewsFeed {
            headlines,
            provider: Some(provider),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::data_source::SourceFuture;

    struct StubNews {
        id: ProviderId,
        result: Result<usize, SourceError>,
        calls: AtomicUsize,
    }

    impl StubNews {
        fn returning(id: ProviderId, count: usize) -> Arc<Self> {
            Arc::new(Self {
                id,
                result: Ok(count),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: ProviderId, error: SourceError) -> Arc<Self> {
            Arc::new(Self {
                id,
                result: Err(error),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl NewsSource for StubNews {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn headlines<'a>(&'a self, _req: NewsRequest) -> SourceFuture<'a, Vec<Headline>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let id = self.id;
            let result: Result<Vec<Headline>, SourceError> = self.result.clone().map(|count| {
                (0..count)
                    .map(|i| Headline {
                        title: format!("{id} headline {i}"),
                        summary: String::new(),
                        published: String::new(),
                        published_at: None,
                        source: id.to_string(),
                    })
                    .collect()
            });
            Box::pin(async move { result })
        }
    }

    fn fetcher(primary: Arc<StubNews>, fallback: Arc<StubNews>) -> NewsFetcher {
        NewsFetcher::new(primary, fallback, Duration::from_secs(300), DEFAULT_NEWS_LIMIT)
    }

    fn symbol() -> Symbol {
        Symbol::parse("AAPL").expect("symbol")
    }

    #[tokio::test]
    async fn primary_results_skip_fallback() {
        let primary = StubNews::returning(ProviderId::Newsapi, 4);
        let fallback = StubNews::returning(ProviderId::Yahoo, 3);

        let feed = fetcher(primary.clone(), fallback.clone()).fetch(&symbol()).await.value;

        assert_eq!(feed.headlines.len(), 4);
        assert_eq!(feed.provider, Some(ProviderId::Newsapi));
        assert_eq!(fallback.calls(), 0);
    }

    #[tokio::test]
    async fn primary_error_uses_fallback_and_records_warning() {
        let primary = StubNews::failing(
            ProviderId::Newsapi,
            SourceError::not_configured(ProviderId::Newsapi, "SENTIMETER_NEWSAPI_KEY"),
        );
        let fallback = StubNews::returning(ProviderId::Yahoo, 2);

        let feed = fetcher(primary, fallback).fetch(&symbol()).await.value;

        assert_eq!(feed.provider, Some(ProviderId::Yahoo));
        assert_eq!(feed.headlines.len(), 2);
        assert!(feed.warnings[0].contains("source.not_configured"));
    }

    #[tokio::test]
    async fn both_sources_failing_yields_cached_empty_feed() {
        let primary = StubNews::failing(ProviderId::Newsapi, SourceError::unavailable("down"));
        let fallback = StubNews::failing(ProviderId::Yahoo, SourceError::unavailable("down"));
        let fetcher = fetcher(primary.clone(), fallback.clone());

        let first = fetcher.fetch(&symbol()).await;
        let second = fetcher.fetch(&symbol()).await;

        assert!(first.value.is_empty());
        assert_eq!(first.value.provider, None);
        assert_eq!(first.value.warnings.len(), 2);
        assert!(second.cache_hit);
        assert_eq!(primary.calls(), 1);
        assert_eq!(fallback.calls(), 1);
    }

    #[tokio::test]
    async fn oversized_provider_response_is_capped() {
        let primary = StubNews::returning(ProviderId::Newsapi, 25);
        let fallback = StubNews::returning(ProviderId::Yahoo, 0);

        let feed = fetcher(primary, fallback).fetch(&symbol()).await.value;
        assert_eq!(feed.headlines.len(), DEFAULT_NEWS_LIMIT);
    }

    #[tokio::test]
    async fn clear_forces_new_upstream_call() {
        let primary = StubNews::returning(ProviderId::Newsapi, 1);
        let fallback = StubNews::returning(ProviderId::Yahoo, 1);
        let fetcher = fetcher(primary.clone(), fallback);

        fetcher.fetch(&symbol()).await;
        fetcher.clear().await;
        let after = fetcher.fetch(&symbol()).await;

        assert!(!after.cache_hit);
        assert_eq!(primary.calls(), 2);
    }

    #[test]
    fn blank_titles_do_not_count() {
        let feed = NewsFeed {
            headlines: vec![Headline {
                title: String::from("  "),
                summary: String::from("body"),
                published: String::new(),
                published_at: None,
                source: String::from("Unknown"),
            }],
            provider: Some(ProviderId::Yahoo),
            warnings: Vec::new(),
        };
        assert!(!feed.is_empty());
        assert!(!feed.has_titles());
    }
}
