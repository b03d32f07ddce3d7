//! Provider adapters.
//!
//! Each adapter serves real upstream data when built on a network transport and
//! deterministic synthetic data when built on [`NoopHttpClient`](crate::NoopHttpClient).

pub mod newsapi;
pub mod yahoo;

pub use newsapi::NewsApiAdapter;
pub use yahoo::{YahooAdapter, YahooAuthManager};

use time::Duration;

use crate::data_source::SourceError;
use crate::http_client::{HttpError, HttpResponse};
use crate::{Headline, ProviderId, Symbol, UtcDateTime};

/// (title, summary, publisher) templates for synthetic headlines; `{}` is the ticker.
const FAKE_HEADLINES: [(&str, &str, &str); 8] = [
    (
        "{} shares surge after strong quarterly earnings beat",
        "Analysts praised robust growth and improving margins.",
        "MarketWatch",
    ),
    (
        "{} faces lawsuit over alleged product defects",
        "Investors worry about weak guidance and mounting legal costs.",
        "Reuters",
    ),
    (
        "{} to hold annual shareholder meeting in June",
        "The company announced the date and location of the meeting.",
        "Business Wire",
    ),
    (
        "Why {} stock could be a great long-term buy",
        "Solid fundamentals and excellent cash flow stand out.",
        "Motley Fool",
    ),
    (
        "{} cuts outlook amid slowing demand",
        "Shares fell after the company reported disappointing sales.",
        "Bloomberg",
    ),
    (
        "{} unveils new product lineup at developer event",
        "",
        "Yahoo Finance",
    ),
    (
        "{} named top pick by bullish analysts",
        "The upgrade cites positive momentum and impressive execution.",
        "Barron's",
    ),
    (
        "Regulators open inquiry into {} accounting practices",
        "The investigation adds to concerns about a risky expansion.",
        "Financial Times",
    ),
];

/// Stable seed for synthetic data derived from the ticker text.
pub(crate) fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

/// Deterministic headline set for mock mode, newest first.
pub(crate) fn fake_headlines(symbol: &Symbol, limit: usize) -> Vec<Headline> {
    let seed = symbol_seed(symbol);
    let start = (seed % FAKE_HEADLINES.len() as u64) as usize;
    let now = UtcDateTime::now().into_inner();

    (0..limit.min(FAKE_HEADLINES.len()))
        .map(|index| {
            let (title, summary, publisher) =
                FAKE_HEADLINES[(start + index) % FAKE_HEADLINES.len()];
            let published_at = UtcDateTime::from_any_offset(
                now - Duration::hours(3 * (index as i64 + 1)),
            );
            Headline {
                title: title.replace("{}", symbol.as_str()),
                summary: summary.to_owned(),
                published: published_at.format_minute(),
                published_at: Some(published_at),
                source: publisher.to_owned(),
            }
        })
        .collect()
}

pub(crate) fn transport_error(provider: ProviderId, error: &HttpError) -> SourceError {
    if error.is_timeout() {
        SourceError::unavailable(format!("{provider} request timed out: {}", error.message()))
    } else {
        SourceError::unavailable(format!("{provider} transport error: {}", error.message()))
    }
}

/// Classifies a non-2xx response.
pub(crate) fn status_error(provider: ProviderId, response: &HttpResponse) -> SourceError {
    match response.status {
        429 => SourceError::rate_limited(format!("{provider} rate limit exceeded")),
        400 | 404 | 422 => SourceError::invalid_request(format!(
            "{provider} rejected the request with status {}",
            response.status
        )),
        status => SourceError::unavailable(format!("{provider} returned status {status}")),
    }
}

pub(crate) fn parse_error(provider: ProviderId, error: serde_json::Error) -> SourceError {
    SourceError::internal(format!("failed to parse {provider} response: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    #[test]
    fn seed_is_stable_per_symbol() {
        let a = Symbol::parse("AAPL").expect("symbol");
        let b = Symbol::parse("aapl").expect("symbol");
        let c = Symbol::parse("MSFT").expect("symbol");
        assert_eq!(symbol_seed(&a), symbol_seed(&b));
        assert_ne!(symbol_seed(&a), symbol_seed(&c));
    }

    #[test]
    fn fake_headlines_respect_limit_and_mention_symbol() {
        let symbol = Symbol::parse("NVDA").expect("symbol");
        let headlines = fake_headlines(&symbol, 3);
        assert_eq!(headlines.len(), 3);
        assert!(headlines.iter().all(|h| h.title.contains("NVDA")));
        assert!(headlines.iter().all(|h| h.published.len() == 16));

        assert_eq!(fake_headlines(&symbol, 50).len(), FAKE_HEADLINES.len());
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let error = status_error(ProviderId::Yahoo, &HttpResponse::with_status(429, ""));
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);

        let error = status_error(ProviderId::Yahoo, &HttpResponse::with_status(503, ""));
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    }
}
