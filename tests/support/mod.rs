//! Shared fixtures: a scripted transport and in-memory provider stubs.

#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use serde_json::json;

use sentimeter_core::data_source::{
    ChartSeries, HistoryRequest, MarketDataSource, NewsRequest, NewsSource, SourceError,
    SourceFuture,
};
use sentimeter_core::{
    Headline, HttpClient, HttpError, HttpRequest, HttpResponse, IssuerInfo, PriceHistory,
    PricePoint, ProviderId, Symbol, UtcDateTime,
};

/// 2024-01-02T00:00:00Z
pub const FIRST_SESSION: i64 = 1_704_153_600;
pub const DAY: i64 = 86_400;

/// Answers each request with the first route whose fragment occurs in the URL, 404 otherwise.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    routes: Vec<(String, HttpResponse)>,
    urls: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, fragment: &str, body: impl Into<String>) -> Self {
        self.routes
            .push((fragment.to_owned(), HttpResponse::ok_json(body)));
        self
    }

    pub fn route_status(mut self, fragment: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes
            .push((fragment.to_owned(), HttpResponse::with_status(status, body)));
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().expect("url log poisoned").clone()
    }

    pub fn calls_to(&self, fragment: &str) -> usize {
        self.urls()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.urls
            .lock()
            .expect("url log poisoned")
            .push(request.url.clone());

        let response = self
            .routes
            .iter()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::with_status(404, "not found"));

        Box::pin(async move { Ok(response) })
    }
}

/// Chart payload with one row per close, a day apart, starting at [`FIRST_SESSION`].
pub fn chart_body(closes: &[f64], volume: u64) -> String {
    let timestamps: Vec<i64> = (0..closes.len() as i64)
        .map(|day| FIRST_SESSION + day * DAY)
        .collect();
    let lows: Vec<f64> = closes.iter().map(|close| close - 1.0).collect();
    let highs: Vec<f64> = closes.iter().map(|close| close + 1.0).collect();
    let volumes: Vec<u64> = closes.iter().map(|_| volume).collect();

    json!({
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "longName": "Chart Meta Name"},
                "timestamp": timestamps,
                "indicators": {"quote": [{
                    "open": closes,
                    "high": highs,
                    "low": lows,
                    "close": closes,
                    "volume": volumes
                }]}
            }],
            "error": null
        }
    })
    .to_string()
}

pub fn empty_chart_body() -> String {
    json!({"chart": {"result": [], "error": null}}).to_string()
}

pub fn quote_summary_body(long_name: &str, market_cap: f64) -> String {
    json!({
        "quoteSummary": {
            "result": [{
                "price": {"longName": long_name, "currency": "USD"},
                "summaryDetail": {"marketCap": {"raw": market_cap, "fmt": "cap"}}
            }],
            "error": null
        }
    })
    .to_string()
}

/// NewsAPI `everything` payload; `(title, description)` pairs published an hour apart.
pub fn newsapi_body(articles: &[(&str, &str)]) -> String {
    let articles: Vec<_> = articles
        .iter()
        .enumerate()
        .map(|(index, (title, description))| {
            json!({
                "source": {"id": null, "name": "Reuters"},
                "title": title,
                "description": description,
                "publishedAt": format!("2024-03-05T{:02}:00:00Z", 14 - index),
            })
        })
        .collect();
    json!({"status": "ok", "totalResults": articles.len(), "articles": articles}).to_string()
}

/// Yahoo search payload with the given titles.
pub fn yahoo_search_body(titles: &[&str]) -> String {
    let news: Vec<_> = titles
        .iter()
        .map(|title| {
            json!({
                "title": title,
                "publisher": "Yahoo Finance",
                "providerPublishTime": FIRST_SESSION,
            })
        })
        .collect();
    json!({"news": news}).to_string()
}

pub fn headline(title: &str, summary: &str) -> Headline {
    Headline {
        title: title.to_owned(),
        summary: summary.to_owned(),
        published: String::from("2024-03-05 14:00"),
        published_at: UtcDateTime::parse("2024-03-05T14:00:00Z").ok(),
        source: String::from("Reuters"),
    }
}

pub fn symbol(input: &str) -> Symbol {
    Symbol::parse(input).expect("valid symbol")
}

/// Market source serving a fixed close series, counting history calls.
pub struct StubMarket {
    closes: Vec<f64>,
    pub history_calls: AtomicUsize,
}

impl StubMarket {
    pub fn new(closes: &[f64]) -> Self {
        Self {
            closes: closes.to_vec(),
            history_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

impl MarketDataSource for StubMarket {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, ChartSeries> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let points = self
            .closes
            .iter()
            .enumerate()
            .map(|(day, &close)| {
                let date = UtcDateTime::from_unix_timestamp(FIRST_SESSION + day as i64 * DAY)
                    .expect("in range");
                PricePoint::new(date, close, close + 1.0, close - 1.0, close, 1_000)
                    .expect("valid point")
            })
            .collect();
        Box::pin(async move {
            Ok(ChartSeries {
                history: PriceHistory::new(req.symbol, req.period, points),
                meta: IssuerInfo::new(),
            })
        })
    }

    fn issuer_info<'a>(&'a self, _symbol: &'a Symbol) -> SourceFuture<'a, IssuerInfo> {
        Box::pin(async move {
            let mut info = IssuerInfo::new();
            info.insert("longName", json!("Stub Corp"));
            info.insert("marketCap", json!(2.5e9));
            Ok(info)
        })
    }
}

/// News source answering with canned headlines or a canned error.
pub struct StubNews {
    id: ProviderId,
    outcome: Result<Vec<Headline>, SourceError>,
    calls: AtomicUsize,
}

impl StubNews {
    pub fn returning(id: ProviderId, headlines: Vec<Headline>) -> Self {
        Self {
            id,
            outcome: Ok(headlines),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(id: ProviderId, error: SourceError) -> Self {
        Self {
            id,
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl NewsSource for StubNews {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn headlines<'a>(&'a self, req: NewsRequest) -> SourceFuture<'a, Vec<Headline>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcome
            .clone()
            .map(|headlines| headlines.into_iter().take(req.limit).collect());
        Box::pin(async move { outcome })
    }
}
