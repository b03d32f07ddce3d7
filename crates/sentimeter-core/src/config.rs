//! Runtime configuration and service wiring.
//!
//! Settings come from the environment (after the binaries load `.env`), then command-line
//! flags override individual fields.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SENTIMETER_NEWSAPI_KEY` (or `NEWSAPI_KEY`) | unset; news falls back to Yahoo |
//! | `SENTIMETER_CACHE_TTL_SECS` | `300` |
//! | `SENTIMETER_SENTIMENT_MODEL` | `vader` |
//! | `SENTIMETER_NEWS_LIMIT` | `10` |
//! | `SENTIMETER_MOCK` | `false` |

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::newsapi::API_KEY_SETTING;
use crate::adapters::{NewsApiAdapter, YahooAdapter};
use crate::cache::DEFAULT_TTL;
use crate::dashboard::DashboardService;
use crate::data_source::{MarketDataSource, NewsSource};
use crate::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use crate::market::MarketDataFetcher;
use crate::news::{NewsFetcher, DEFAULT_NEWS_LIMIT};
use crate::sentiment::{SentimentModelKind, SentimentScorer};
use crate::{Period, ValidationError};

pub const DEFAULT_SYMBOL: &str = "AAPL";

const LEGACY_API_KEY_SETTING: &str = "NEWSAPI_KEY";
const CACHE_TTL_SETTING: &str = "SENTIMETER_CACHE_TTL_SECS";
const MODEL_SETTING: &str = "SENTIMETER_SENTIMENT_MODEL";
const NEWS_LIMIT_SETTING: &str = "SENTIMETER_NEWS_LIMIT";
const MOCK_SETTING: &str = "SENTIMETER_MOCK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub default_symbol: String,
    pub default_period: Period,
    pub cache_ttl: Duration,
    pub news_limit: usize,
    pub newsapi_key: Option<String>,
    pub sentiment_model: SentimentModelKind,
    /// Serve deterministic synthetic data instead of calling providers.
    pub mock: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_symbol: String::from(DEFAULT_SYMBOL),
            default_period: Period::default(),
            cache_ttl: DEFAULT_TTL,
            news_limit: DEFAULT_NEWS_LIMIT,
            newsapi_key: None,
            sentiment_model: SentimentModelKind::default(),
            mock: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        config.newsapi_key = read(API_KEY_SETTING).or_else(|| read(LEGACY_API_KEY_SETTING));

        if let Some(value) = read(CACHE_TTL_SETTING) {
            let seconds = value
                .parse::<u64>()
                .map_err(|_| invalid_setting(CACHE_TTL_SETTING, &value))?;
            config.cache_ttl = Duration::from_secs(seconds);
        }

        if let Some(value) = read(MODEL_SETTING) {
            config.sentiment_model = value.parse()?;
        }

        if let Some(value) = read(NEWS_LIMIT_SETTING) {
            config.news_limit = value
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| invalid_setting(NEWS_LIMIT_SETTING, &value))?;
        }

        if let Some(value) = read(MOCK_SETTING) {
            config.mock = parse_flag(&value).ok_or_else(|| invalid_setting(MOCK_SETTING, &value))?;
        }

        Ok(config)
    }

    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    pub fn with_sentiment_model(mut self, model: SentimentModelKind) -> Self {
        self.sentiment_model = model;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_newsapi_key(mut self, key: impl Into<String>) -> Self {
        self.newsapi_key = Some(key.into());
        self
    }

    /// Transport chosen by `mock`: the no-op client or a live reqwest client.
    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        if self.mock {
            Arc::new(NoopHttpClient)
        } else {
            Arc::new(ReqwestHttpClient::new())
        }
    }

    pub fn build_service(&self) -> DashboardService {
        self.build_service_with_client(self.http_client())
    }

    /// Wires adapters, fetchers and the scorer around a caller-supplied transport.
    pub fn build_service_with_client(&self, http_client: Arc<dyn HttpClient>) -> DashboardService {
        let yahoo = Arc::new(YahooAdapter::with_http_client(Arc::clone(&http_client)));
        let newsapi = Arc::new(NewsApiAdapter::with_http_client(
            http_client,
            self.newsapi_key.clone(),
        ));

        if !newsapi.is_configured() {
            tracing::info!(
                setting = API_KEY_SETTING,
                "news api key not set; headlines will come from the fallback source"
            );
        }

        let market_source: Arc<dyn MarketDataSource> = yahoo.clone();
        let fallback_news: Arc<dyn NewsSource> = yahoo;
        let primary_news: Arc<dyn NewsSource> = newsapi;

        DashboardService::new(
            MarketDataFetcher::new(market_source, self.cache_ttl),
            NewsFetcher::new(primary_news, fallback_news, self.cache_ttl, self.news_limit),
            SentimentScorer::from_kind(self.sentiment_model),
        )
    }
}

fn invalid_setting(name: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidSetting {
        name,
        value: value.to_owned(),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::ProviderId;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = DashboardConfig::from_lookup(lookup(&[])).expect("valid");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.default_symbol, "AAPL");
        assert_eq!(config.default_period, Period::OneMonth);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.news_limit, 10);
    }

    #[test]
    fn reads_every_setting() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("NEWSAPI_KEY", "legacy"),
            ("SENTIMETER_CACHE_TTL_SECS", "60"),
            ("SENTIMETER_SENTIMENT_MODEL", "vader-finance"),
            ("SENTIMETER_NEWS_LIMIT", "5"),
            ("SENTIMETER_MOCK", "true"),
        ]))
        .expect("valid");

        assert_eq!(config.newsapi_key.as_deref(), Some("legacy"));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.sentiment_model, SentimentModelKind::VaderFinance);
        assert_eq!(config.news_limit, 5);
        assert!(config.mock);
    }

    #[test]
    fn prefixed_key_wins_and_blank_is_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("SENTIMETER_NEWSAPI_KEY", "primary"),
            ("NEWSAPI_KEY", "legacy"),
        ]))
        .expect("valid");
        assert_eq!(config.newsapi_key.as_deref(), Some("primary"));

        let blank =
            DashboardConfig::from_lookup(lookup(&[("SENTIMETER_NEWSAPI_KEY", "   ")])).expect("valid");
        assert_eq!(blank.newsapi_key, None);
    }

    #[test]
    fn rejects_malformed_values() {
        let err = DashboardConfig::from_lookup(lookup(&[("SENTIMETER_CACHE_TTL_SECS", "soon")]))
            .expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::InvalidSetting {
                name: "SENTIMETER_CACHE_TTL_SECS",
                ..
            }
        ));

        let err = DashboardConfig::from_lookup(lookup(&[("SENTIMETER_NEWS_LIMIT", "0")]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSetting { .. }));

        let err = DashboardConfig::from_lookup(lookup(&[("SENTIMETER_SENTIMENT_MODEL", "bert")]))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidSentimentModel { .. }));
    }

    #[test]
    fn mock_service_uses_yahoo_for_market_and_fallback() {
        let service = DashboardConfig::default().with_mock(true).build_service();
        assert_eq!(service.market().provider(), ProviderId::Yahoo);
        assert_eq!(
            service.news().providers(),
            [ProviderId::Newsapi, ProviderId::Yahoo]
        );
        assert_eq!(service.scorer().model_name(), "vader");
    }
}
