//! Provider traits and request/response types.
//!
//! | Trait | Request | Response | Implemented by |
//! |-------|---------|----------|----------------|
//! | [`MarketDataSource::history`] | [`HistoryRequest`] | [`ChartSeries`] | Yahoo |
//! | [`MarketDataSource::issuer_info`] | [`Symbol`] | [`IssuerInfo`] | Yahoo |
//! | [`NewsSource::headlines`] | [`NewsRequest`] | `Vec<Headline>` | NewsAPI, Yahoo |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Headline, IssuerInfo, Period, PriceHistory, ProviderId, Symbol};

/// Boxed future returned by provider calls.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    NotConfigured,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    /// The provider needs a credential that was not supplied.
    pub fn not_configured(provider: ProviderId, setting: &str) -> Self {
        Self::new(
            SourceErrorKind::NotConfigured,
            format!("source '{provider}' is not configured: {setting} is missing"),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotConfigured => "source.not_configured",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for price history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub period: Period,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, period: Period) -> Self {
        Self { symbol, period }
    }
}

/// Request payload for headline searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    pub symbol: Symbol,
    pub limit: usize,
}

impl NewsRequest {
    pub fn new(symbol: Symbol, limit: usize) -> Result<Self, SourceError> {
        if limit == 0 {
            return Err(SourceError::invalid_request(
                "news request limit must be greater than zero",
            ));
        }
        Ok(Self { symbol, limit })
    }
}

/// Price history plus the descriptive fields that ride along with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub history: PriceHistory,
    /// Issuer fields the chart payload carries; used when the metadata call fails.
    pub meta: IssuerInfo,
}

/// Market-data provider contract.
pub trait MarketDataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Daily price history for the requested window.
    ///
    /// An empty series is a valid response; callers decide what it means.
    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, ChartSeries>;

    /// Issuer metadata for a symbol.
    fn issuer_info<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, IssuerInfo>;
}

/// Headline provider contract.
pub trait NewsSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Up to `req.limit` headlines in provider order.
    fn headlines<'a>(&'a self, req: NewsRequest) -> SourceFuture<'a, Vec<Headline>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert_eq!(
            SourceError::not_configured(ProviderId::Newsapi, "SENTIMETER_NEWSAPI_KEY").code(),
            "source.not_configured"
        );
    }

    #[test]
    fn not_configured_names_the_setting() {
        let error = SourceError::not_configured(ProviderId::Newsapi, "SENTIMETER_NEWSAPI_KEY");
        assert!(error.message().contains("SENTIMETER_NEWSAPI_KEY"));
        assert_eq!(error.kind(), SourceErrorKind::NotConfigured);
    }

    #[test]
    fn news_request_rejects_zero_limit() {
        let symbol = Symbol::parse("AAPL").expect("symbol");
        let error = NewsRequest::new(symbol, 0).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    }
}
