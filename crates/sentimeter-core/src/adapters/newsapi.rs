use std::sync::Arc;

use serde::Deserialize;

use super::{fake_headlines, parse_error, status_error, transport_error};
use crate::data_source::{NewsRequest, NewsSource, SourceError, SourceFuture};
use crate::domain::{format_minute, parse_published};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::{Headline, ProviderId, UtcDateTime};

const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

/// Name of the setting that carries the NewsAPI key.
pub const API_KEY_SETTING: &str = "SENTIMETER_NEWSAPI_KEY";

/// NewsAPI `everything` search, the primary headline source.
#[derive(Clone)]
pub struct NewsApiAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    use_real_api: bool,
}

impl Default for NewsApiAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(NoopHttpClient), None)
    }
}

impl NewsApiAdapter {
    /// An empty or whitespace key counts as missing.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            api_key: api_key
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty()),
            use_real_api,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_real_headlines(
        &self,
        req: &NewsRequest,
        api_key: &str,
    ) -> Result<Vec<Headline>, SourceError> {
        let endpoint = format!(
            "{EVERYTHING_URL}?q={}&sortBy=publishedAt&language=en&apiKey={}",
            urlencoding::encode(req.symbol.as_str()),
            urlencoding::encode(api_key)
        );
        // The URL carries the key, so only the symbol is logged.
        tracing::debug!(provider = "newsapi", symbol = %req.symbol, "upstream request");

        let response = self
            .http_client
            .execute(HttpRequest::get(endpoint))
            .await
            .map_err(|e| transport_error(ProviderId::Newsapi, &e))?;

        if !response.is_success() {
            // Error bodies carry a machine-readable code worth surfacing.
            return Err(serde_json::from_str::<NewsApiResponse>(&response.body)
                .ok()
                .and_then(|payload| payload.error())
                .unwrap_or_else(|| status_error(ProviderId::Newsapi, &response)));
        }

        let payload: NewsApiResponse = serde_json::from_str(&response.body)
            .map_err(|e| parse_error(ProviderId::Newsapi, e))?;
        let articles = match payload.error() {
            Some(error) => return Err(error),
            None => payload.articles,
        };

        Ok(articles
            .into_iter()
            .take(req.limit)
            .map(NewsApiArticle::into_headline)
            .collect())
    }
}

impl NewsSource for NewsApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Newsapi
    }

    fn headlines<'a>(&'a self, req: NewsRequest) -> SourceFuture<'a, Vec<Headline>> {
        Box::pin(async move {
            let Some(api_key) = self.api_key.as_deref() else {
                return Err(SourceError::not_configured(
                    ProviderId::Newsapi,
                    API_KEY_SETTING,
                ));
            };

            if self.use_real_api {
                self.fetch_real_headlines(&req, api_key).await
            } else {
                Ok(fake_headlines(&req.symbol, req.limit))
            }
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

impl NewsApiResponse {
    fn error(&self) -> Option<SourceError> {
        if self.status.as_deref() != Some("error") {
            return None;
        }
        let code = self.code.as_deref().unwrap_or("unknown");
        let message = format!(
            "newsapi error {code}: {}",
            self.message.as_deref().unwrap_or("no message")
        );
        Some(match code {
            "rateLimited" => SourceError::rate_limited(message),
            "parameterInvalid" | "parametersMissing" => SourceError::invalid_request(message),
            _ => SourceError::unavailable(message),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<NewsApiSource>,
}

#[derive(Debug, Clone, Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiArticle {
    fn into_headline(self) -> Headline {
        let parsed = self.published_at.as_deref().and_then(parse_published);
        Headline {
            title: self.title.unwrap_or_default(),
            summary: self.description.unwrap_or_default(),
            published: parsed.map(format_minute).unwrap_or_default(),
            published_at: parsed.map(UtcDateTime::from_any_offset),
            source: self
                .source
                .and_then(|source| source.name)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| String::from(Headline::UNKNOWN_SOURCE)),
        }
    }
}
