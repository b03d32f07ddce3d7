//! # Sentimeter Core
//!
//! Market data, news headlines and headline sentiment for the `sentimeter` dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo Finance and NewsAPI adapters |
//! | [`cache`] | TTL cache with serialized fills |
//! | [`config`] | Environment configuration and service wiring |
//! | [`dashboard`] | Fetch cycle and presentation view model |
//! | [`data_source`] | Source traits, requests and `SourceError` |
//! | [`domain`] | Symbol, period, price history, headlines |
//! | [`envelope`] | JSON response envelope |
//! | [`error`] | Validation and core errors |
//! | [`http_client`] | HTTP transport seam |
//! | [`market`] | Cached market-data fetcher |
//! | [`news`] | Cached news fetcher with fallback |
//! | [`sentiment`] | Scoring models and aggregation |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentimeter_core::{DashboardConfig, Period};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = DashboardConfig::from_env()?.build_service();
//!     let report = service.run("AAPL", Period::OneMonth).await;
//!
//!     if let Some(panel) = report.price_panel() {
//!         println!("{}: {} {}", panel.metrics.title, panel.metrics.price, panel.metrics.delta);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ CLI / Web page   │
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ DashboardService │────▶│ SentimentScorer  │
//! └────────┬─────────┘     └──────────────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Market / News    │────▶│ TtlCache         │
//! │ fetchers         │     └──────────────────┘
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ Adapters         │────▶│ HTTP client      │
//! │ (Yahoo, NewsAPI) │     │ (reqwest / noop) │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! The NewsAPI key is read from the environment only and never logged.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod market;
pub mod news;
pub mod sentiment;
pub mod source;

pub use adapters::{NewsApiAdapter, YahooAdapter, YahooAuthManager};

pub use cache::{CacheMode, Lookup, TtlCache};

pub use config::DashboardConfig;

pub use dashboard::{DashboardReport, DashboardService, MarketPanel, SentimentPanel};

pub use data_source::{
    ChartSeries, HistoryRequest, MarketDataSource, NewsRequest, NewsSource, SourceError,
    SourceErrorKind,
};

pub use domain::{
    format_minute, parse_published, Headline, IssuerInfo, Period, PriceHistory, PricePoint,
    Symbol, UtcDateTime,
};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

pub use market::{MarketData, MarketDataFetcher, MarketSnapshot};

pub use news::{NewsFeed, NewsFetcher};

pub use sentiment::{
    AggregateSentiment, SentimentLabel, SentimentModel, SentimentModelKind, SentimentResult,
    SentimentScorer,
};

pub use source::ProviderId;
