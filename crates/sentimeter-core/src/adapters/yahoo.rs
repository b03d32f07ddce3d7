use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{Duration, Weekday};
use tokio::sync::Mutex;

use super::{fake_headlines, parse_error, status_error, symbol_seed, transport_error};
use crate::data_source::{
    ChartSeries, HistoryRequest, MarketDataSource, NewsRequest, NewsSource, SourceError,
    SourceFuture,
};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{
    Headline, IssuerInfo, Period, PriceHistory, PricePoint, ProviderId, Symbol, UtcDateTime,
};

const REFERER: &str = "https://finance.yahoo.com/";
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URLS: [&str; 2] = [
    "https://query1.finance.yahoo.com/v1/test/getcrumb",
    "https://query2.finance.yahoo.com/v1/test/getcrumb",
];
const SUMMARY_MODULES: [&str; 2] = ["price", "summaryDetail"];

// ============================================================================
// Yahoo Auth Manager - Handles cookie/crumb authentication
// ============================================================================

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Manages the Yahoo cookie/crumb handshake required by the quote-summary endpoint.
///
/// 1. Session cookie from fc.yahoo.com (kept by the transport's cookie store)
/// 2. Crumb token from `v1/test/getcrumb`
///
/// The chart and search endpoints work without a crumb.
#[derive(Debug)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
    ttl: StdDuration,
}

impl Default for YahooAuthManager {
    fn default() -> Self {
        Self {
            crumb: Mutex::new(None),
            ttl: StdDuration::from_secs(3600),
        }
    }
}

impl YahooAuthManager {
    /// Returns the cached crumb, running the handshake when absent or stale.
    ///
    /// The lock is held across the handshake so concurrent callers share one refresh.
    pub async fn crumb(&self, http_client: &dyn HttpClient) -> Result<String, SourceError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < self.ttl {
                return Ok(crumb.value.clone());
            }
        }

        let value = fetch_crumb(http_client).await?;
        *cached = Some(CachedCrumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops the cached crumb so the next call re-runs the handshake.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }
}

async fn fetch_crumb(http_client: &dyn HttpClient) -> Result<String, SourceError> {
    // fc.yahoo.com answers 404 but still sets the session cookie.
    let cookie_request = HttpRequest::get(COOKIE_URL).with_header("referer", REFERER);
    http_client
        .execute(cookie_request)
        .await
        .map_err(|e| transport_error(ProviderId::Yahoo, &e))?;

    for endpoint in CRUMB_URLS {
        let request = HttpRequest::get(endpoint).with_header("referer", REFERER);
        let Ok(response) = http_client.execute(request).await else {
            continue;
        };
        if !response.is_success() {
            if response.status == 429 {
                return Err(SourceError::rate_limited(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            continue;
        }

        let body = response.body.trim();
        if body.contains("<html") || body.contains("<!DOCTYPE") {
            continue;
        }
        if body.to_ascii_lowercase().contains("too many requests") {
            return Err(SourceError::rate_limited(
                "yahoo rate limited while fetching crumb",
            ));
        }
        if !body.is_empty() && body.len() < 100 && !body.contains(char::is_whitespace) {
            return Ok(body.to_owned());
        }
    }

    Err(SourceError::unavailable(
        "failed to fetch yahoo crumb from all endpoints",
    ))
}

// ============================================================================
// Yahoo Adapter
// ============================================================================

/// Yahoo Finance adapter: price history, issuer metadata and the fallback news feed.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    auth_manager: Arc<YahooAuthManager>,
    use_real_api: bool,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(NoopHttpClient))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth_manager: Arc::new(YahooAuthManager::default()),
            use_real_api,
        }
    }

    async fn get_body(&self, url: String) -> Result<String, SourceError> {
        tracing::debug!(provider = "yahoo", url = %url, "upstream request");
        let request = HttpRequest::get(url).with_header("referer", REFERER);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| transport_error(ProviderId::Yahoo, &e))?;

        if !response.is_success() {
            return Err(status_error(ProviderId::Yahoo, &response));
        }
        Ok(response.body)
    }
}

impl MarketDataSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(&'a self, req: HistoryRequest) -> SourceFuture<'a, ChartSeries> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                Ok(fake_history(&req))
            }
        })
    }

    fn issuer_info<'a>(&'a self, symbol: &'a Symbol) -> SourceFuture<'a, IssuerInfo> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_issuer_info(symbol).await
            } else {
                Ok(fake_issuer_info(symbol))
            }
        })
    }
}

impl NewsSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn headlines<'a>(&'a self, req: NewsRequest) -> SourceFuture<'a, Vec<Headline>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_headlines(&req).await
            } else {
                Ok(fake_headlines(&req.symbol, req.limit))
            }
        })
    }
}

// Real API implementation methods
impl YahooAdapter {
    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<ChartSeries, SourceError> {
        let endpoint = format!(
            "{CHART_URL}/{}?range={}&interval=1d",
            urlencoding::encode(req.symbol.as_str()),
            req.period.as_str()
        );
        let body = self.get_body(endpoint).await?;
        parse_chart_response(&body, &req.symbol, req.period)
    }

    async fn fetch_real_issuer_info(&self, symbol: &Symbol) -> Result<IssuerInfo, SourceError> {
        let crumb = self.auth_manager.crumb(self.http_client.as_ref()).await?;
        let endpoint = format!(
            "{QUOTE_SUMMARY_URL}/{}?modules={}&crumb={}",
            urlencoding::encode(symbol.as_str()),
            SUMMARY_MODULES.join(","),
            urlencoding::encode(&crumb)
        );

        match self.get_body(endpoint).await {
            Ok(body) => parse_quote_summary(&body),
            Err(error) => {
                // A rejected crumb is refreshed on the next call; this one still fails.
                self.auth_manager.invalidate().await;
                Err(error)
            }
        }
    }

    async fn fetch_real_headlines(&self, req: &NewsRequest) -> Result<Vec<Headline>, SourceError> {
        let endpoint = format!(
            "{SEARCH_URL}?q={}&quotesCount=0&newsCount={}",
            urlencoding::encode(req.symbol.as_str()),
            req.limit
        );
        let body = self.get_body(endpoint).await?;
        parse_search_news(&body, req.limit)
    }
}

fn parse_chart_response(
    body: &str,
    symbol: &Symbol,
    period: Period,
) -> Result<ChartSeries, SourceError> {
    let chart_response: YahooChartResponse =
        serde_json::from_str(body).map_err(|e| parse_error(ProviderId::Yahoo, e))?;

    if let Some(error) = chart_response.chart.error.filter(|e| !e.is_null()) {
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {error}"
        )));
    }

    let Some(result) = chart_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
    else {
        return Ok(ChartSeries {
            history: PriceHistory::new(symbol.clone(), period, Vec::new()),
            meta: IssuerInfo::new(),
        });
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, &ts_value) in result.timestamp.iter().enumerate() {
        // Rows with any missing OHLC value are dropped.
        let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) else {
            continue;
        };

        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .unwrap_or(0);

        let point = UtcDateTime::from_unix_timestamp(ts_value)
            .and_then(|date| PricePoint::new(date, *open, *high, *low, *close, volume));
        match point {
            Ok(point) => points.push(point),
            Err(error) => {
                tracing::debug!(provider = "yahoo", %symbol, %error, "skipping invalid price row");
            }
        }
    }

    let meta = result
        .meta
        .into_iter()
        .filter(|(_, value)| !value.is_object() && !value.is_array())
        .collect();

    Ok(ChartSeries {
        history: PriceHistory::new(symbol.clone(), period, points),
        meta,
    })
}

fn parse_quote_summary(body: &str) -> Result<IssuerInfo, SourceError> {
    let summary_response: YahooQuoteSummaryResponse =
        serde_json::from_str(body).map_err(|e| parse_error(ProviderId::Yahoo, e))?;

    if let Some(error) = summary_response.quote_summary.error.filter(|e| !e.is_null()) {
        return Err(SourceError::unavailable(format!(
            "yahoo quoteSummary API error: {error}"
        )));
    }

    let result = summary_response
        .quote_summary
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| SourceError::unavailable("yahoo quoteSummary returned no result"))?;

    let mut info = IssuerInfo::new();
    for module in SUMMARY_MODULES {
        let Some(Value::Object(fields)) = result.get(module) else {
            continue;
        };
        for (field, value) in fields {
            if info.get(field).is_none() {
                info.insert(field.clone(), unwrap_raw(value));
            }
        }
    }

    Ok(info)
}

/// Yahoo wraps numbers as `{"raw": 1.0, "fmt": "1.00"}`; keep the raw number.
fn unwrap_raw(value: &Value) -> Value {
    match value {
        Value::Object(fields) if fields.is_empty() => Value::Null,
        Value::Object(fields) if fields.contains_key("raw") => {
            fields.get("raw").cloned().unwrap_or(Value::Null)
        }
        other => other.clone(),
    }
}

fn parse_search_news(body: &str, limit: usize) -> Result<Vec<Headline>, SourceError> {
    let search_response: YahooSearchResponse =
        serde_json::from_str(body).map_err(|e| parse_error(ProviderId::Yahoo, e))?;

    let headlines = search_response
        .news
        .into_iter()
        .take(limit)
        .map(|item| {
            let published_at = item
                .provider_publish_time
                .and_then(|seconds| UtcDateTime::from_unix_timestamp(seconds).ok());
            Headline {
                title: item.title.unwrap_or_default(),
                summary: item.summary.unwrap_or_default(),
                published: published_at
                    .map(UtcDateTime::format_minute)
                    .unwrap_or_default(),
                published_at,
                source: item
                    .publisher
                    .filter(|publisher| !publisher.trim().is_empty())
                    .unwrap_or_else(|| String::from(Headline::UNKNOWN_SOURCE)),
            }
        })
        .collect();

    Ok(headlines)
}

// Fake data methods (for mock mode)

fn fake_history(req: &HistoryRequest) -> ChartSeries {
    let seed = symbol_seed(&req.symbol);
    let days = req.period.trading_days();
    let today = UtcDateTime::now().into_inner().date().midnight().assume_utc();

    let mut dates = Vec::with_capacity(days);
    let mut cursor = today;
    while dates.len() < days {
        if !matches!(cursor.weekday(), Weekday::Saturday | Weekday::Sunday) {
            dates.push(cursor);
        }
        cursor -= Duration::days(1);
    }
    dates.reverse();

    let base = 90.0 + (seed % 350) as f64 / 10.0;
    let mut previous_close = base;
    let points = dates
        .into_iter()
        .enumerate()
        .filter_map(|(index, date)| {
            let swing = ((seed.wrapping_add(index as u64 * 7)) % 41) as f64 / 10.0 - 2.0;
            let open = previous_close;
            let close = (base + swing + index as f64 * 0.15).max(1.0);
            previous_close = close;
            PricePoint::new(
                UtcDateTime::from_any_offset(date),
                open,
                open.max(close) + 0.8,
                (open.min(close) - 0.6).max(0.0),
                close,
                20_000_000 + seed % 5_000_000 + index as u64 * 12_345,
            )
            .ok()
        })
        .collect();

    let mut meta = IssuerInfo::new();
    meta.insert(IssuerInfo::CURRENCY, Value::from("USD"));
    meta.insert("symbol", Value::from(req.symbol.as_str()));

    ChartSeries {
        history: PriceHistory::new(req.symbol.clone(), req.period, points),
        meta,
    }
}

fn fake_issuer_info(symbol: &Symbol) -> IssuerInfo {
    let seed = symbol_seed(symbol);
    let mut info = IssuerInfo::new();
    info.insert(
        IssuerInfo::MARKET_CAP,
        Value::from(500_000_000_000.0 + (seed % 300_000) as f64 * 1_000_000.0),
    );
    info.insert(
        IssuerInfo::LONG_NAME,
        Value::from(format!("{} Holdings Inc.", symbol.as_str())),
    );
    info.insert(IssuerInfo::CURRENCY, Value::from("USD"));
    info.insert(IssuerInfo::EXCHANGE, Value::from("NMS"));
    info
}

// Yahoo Finance API response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: Map<String, Value>,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooSearchResponse {
    #[serde(default)]
    news: Vec<YahooNewsItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooNewsItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(rename = "providerPublishTime", default)]
    provider_publish_time: Option<i64>,
    #[serde(default)]
    publisher: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex as StdMutex;
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    /// Serves the first route whose URL fragment matches; 404 otherwise.
    #[derive(Debug, Default)]
    struct RecordingHttpClient {
        routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
        requests: StdMutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn route(mut self, fragment: &'static str, body: &str) -> Self {
            self.routes.push((fragment, Ok(HttpResponse::ok_json(body))));
            self
        }

        fn route_status(mut self, fragment: &'static str, status: u16) -> Self {
            self.routes
                .push((fragment, Ok(HttpResponse::with_status(status, ""))));
            self
        }

        fn recorded_urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            let response = self
                .routes
                .iter()
                .find(|(fragment, _)| request.url.contains(fragment))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")));
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            Box::pin(async move { response })
        }
    }

    const CHART_BODY: &str = r#"{"chart":{"result":[{
        "meta":{"currency":"USD","symbol":"AAPL","longName":"Apple Inc.","currentTradingPeriod":{}},
        "timestamp":[1704205800,1704292200,1704378600],
        "indicators":{"quote":[{
            "open":[187.15,184.22,null],
            "high":[188.44,185.88,183.09],
            "low":[183.89,183.43,180.88],
            "close":[185.64,184.25,181.91],
            "volume":[82488700,58414500,71983600]
        }]}
    }],"error":null}}"#;

    fn adapter(client: RecordingHttpClient) -> (YahooAdapter, Arc<RecordingHttpClient>) {
        let client = Arc::new(client);
        (YahooAdapter::with_http_client(client.clone()), client)
    }

    fn aapl() -> Symbol {
        Symbol::parse("AAPL").expect("valid symbol")
    }

    #[test]
    fn chart_rows_missing_ohlc_are_skipped() {
        let (adapter, client) = adapter(RecordingHttpClient::default().route("/chart/", CHART_BODY));

        let series = block_on(adapter.history(HistoryRequest::new(aapl(), Period::FiveDays)))
            .expect("history should parse");

        assert_eq!(series.history.len(), 2);
        assert_eq!(series.history.latest().map(|p| p.close), Some(184.25));
        assert_eq!(series.meta.long_name(), Some("Apple Inc."));
        assert!(series.meta.get("currentTradingPeriod").is_none());
        assert!(client.recorded_urls()[0].ends_with("/chart/AAPL?range=5d&interval=1d"));
    }

    #[test]
    fn missing_chart_result_is_an_empty_history() {
        let body = r#"{"chart":{"result":null,"error":null}}"#;
        let (adapter, _) = adapter(RecordingHttpClient::default().route("/chart/", body));

        let series = block_on(adapter.history(HistoryRequest::new(aapl(), Period::OneMonth)))
            .expect("empty history is not an error");
        assert!(series.history.is_empty());
    }

    #[test]
    fn chart_error_object_is_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let (adapter, _) = adapter(RecordingHttpClient::default().route("/chart/", body));

        let error = block_on(adapter.history(HistoryRequest::new(aapl(), Period::OneMonth)))
            .expect_err("error payload must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(error.message().contains("delisted"));
    }

    #[test]
    fn quote_summary_uses_crumb_and_unwraps_raw_values() {
        let body = r#"{"quoteSummary":{"result":[{
            "price":{"marketCap":{"raw":2.9e12,"fmt":"2.9T"},"longName":"Apple Inc.","currency":"USD"},
            "summaryDetail":{"marketCap":{"raw":1.0,"fmt":"1"},"beta":{"raw":1.29,"fmt":"1.29"},"trailingPE":{}}
        }],"error":null}}"#;
        let (adapter, client) = adapter(
            RecordingHttpClient::default()
                .route("fc.yahoo.com", "")
                .route("getcrumb", "abc123")
                .route("/quoteSummary/", body),
        );

        let info = block_on(adapter.issuer_info(&aapl())).expect("summary should parse");
        assert_eq!(info.market_cap(), Some(2.9e12));
        assert_eq!(info.long_name(), Some("Apple Inc."));
        assert_eq!(info.get("beta").and_then(Value::as_f64), Some(1.29));
        assert!(info.get("trailingPE").is_none());

        // Second call reuses the cached crumb.
        block_on(adapter.issuer_info(&aapl())).expect("summary should parse");
        let urls = client.recorded_urls();
        assert_eq!(urls.iter().filter(|u| u.contains("getcrumb")).count(), 1);
        assert!(urls
            .iter()
            .any(|u| u.contains("modules=price,summaryDetail&crumb=abc123")));
    }

    #[test]
    fn rejected_quote_summary_invalidates_crumb() {
        let (adapter, client) = adapter(
            RecordingHttpClient::default()
                .route("fc.yahoo.com", "")
                .route("getcrumb", "abc123")
                .route_status("/quoteSummary/", 401),
        );

        for _ in 0..2 {
            let error = block_on(adapter.issuer_info(&aapl())).expect_err("must fail");
            assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        }

        let crumb_calls = client
            .recorded_urls()
            .iter()
            .filter(|u| u.contains("getcrumb"))
            .count();
        assert_eq!(crumb_calls, 2);
    }

    #[test]
    fn search_news_maps_epoch_time_and_default_publisher() {
        let body = r#"{"news":[
            {"title":"Apple rallies","providerPublishTime":1700000000,"publisher":"Reuters"},
            {"title":"Apple slips","summary":"Weak demand"},
            {"title":"ignored"}
        ]}"#;
        let (adapter, client) = adapter(RecordingHttpClient::default().route("/search", body));

        let request = NewsRequest::new(aapl(), 2).expect("valid request");
        let headlines = block_on(adapter.headlines(request)).expect("news should parse");

        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].published, "2023-11-14 22:13");
        assert_eq!(headlines[0].source, "Reuters");
        assert_eq!(headlines[1].published, "");
        assert_eq!(headlines[1].summary, "Weak demand");
        assert_eq!(headlines[1].source, Headline::UNKNOWN_SOURCE);
        assert!(client.recorded_urls()[0].contains("q=AAPL&quotesCount=0&newsCount=2"));
    }

    #[test]
    fn rate_limited_chart_maps_to_rate_limited_error() {
        let (adapter, _) = adapter(RecordingHttpClient::default().route_status("/chart/", 429));

        let error = block_on(adapter.history(HistoryRequest::new(aapl(), Period::OneMonth)))
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    }

    #[test]
    fn mock_mode_serves_deterministic_history() {
        let adapter = YahooAdapter::default();
        let request = HistoryRequest::new(aapl(), Period::ThreeMonths);

        let first = block_on(adapter.history(request.clone())).expect("mock history");
        let second = block_on(adapter.history(request)).expect("mock history");

        assert_eq!(first.history.len(), Period::ThreeMonths.trading_days());
        let closes = |s: &ChartSeries| s.history.closes().collect::<Vec<_>>();
        assert_eq!(closes(&first), closes(&second));

        let info = block_on(adapter.issuer_info(&aapl())).expect("mock issuer");
        assert!(info.market_cap().is_some());
    }

    fn block_on<F>(future: F) -> F::Output
    where
        F: Future,
    {
        let waker = noop_waker();
        let mut context = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);

        loop {
            match future.as_mut().poll(&mut context) {
                Poll::Ready(output) => return output,
                Poll::Pending => std::thread::yield_now(),
            }
        }
    }

    fn noop_waker() -> Waker {
        // SAFETY: The vtable functions never dereference the data pointer and are no-op operations.
        unsafe { Waker::from_raw(noop_raw_waker()) }
    }

    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &NOOP_RAW_WAKER_VTABLE)
    }

    unsafe fn noop_raw_waker_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }

    unsafe fn noop_raw_waker_wake(_: *const ()) {}

    unsafe fn noop_raw_waker_wake_by_ref(_: *const ()) {}

    unsafe fn noop_raw_waker_drop(_: *const ()) {}

    static NOOP_RAW_WAKER_VTABLE: RawWakerVTable = RawWakerVTable::new(
        noop_raw_waker_clone,
        noop_raw_waker_wake,
        noop_raw_waker_wake_by_ref,
        noop_raw_waker_drop,
    );
}
