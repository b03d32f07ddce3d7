use serde::Serialize;

use sentimeter_core::dashboard::NO_NEWS_WARNING;
use sentimeter_core::{
    AggregateSentiment, CacheMode, DashboardService, Headline, ProviderId, SentimentResult, Symbol,
};

use crate::cli::NewsArgs;
use crate::error::CliError;
use crate::output::terminal;

use super::CommandResult;

#[derive(Debug, Serialize)]
pub struct ScoredHeadline {
    pub headline: Headline,
    pub sentiment: SentimentResult,
}

#[derive(Debug, Serialize)]
pub struct NewsResponseData {
    pub symbol: Symbol,
    pub provider: Option<ProviderId>,
    pub model: &'static str,
    pub headlines: Vec<ScoredHeadline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateSentiment>,
}

pub async fn run(
    args: &NewsArgs,
    service: &DashboardService,
    mode: CacheMode,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let lookup = service.news().fetch_with_mode(&symbol, mode).await;
    let feed = lookup.value;

    let scorer = service.scorer();
    let headlines: Vec<ScoredHeadline> = feed
        .headlines
        .iter()
        .map(|headline| ScoredHeadline {
            sentiment: scorer.score_headline(headline),
            headline: headline.clone(),
        })
        .collect();
    let results: Vec<SentimentResult> = headlines.iter().map(|h| h.sentiment).collect();

    let data = NewsResponseData {
        symbol,
        provider: feed.provider,
        model: scorer.model_name(),
        aggregate: AggregateSentiment::from_results(&results),
        headlines,
    };

    let source_chain = match feed.provider {
        Some(provider) => vec![provider],
        None => service.news().providers().to_vec(),
    };

    let mut warnings = feed.warnings.clone();
    if !feed.has_titles() {
        warnings.push(String::from(NO_NEWS_WARNING));
    }

    Ok(CommandResult::ok(serde_json::to_value(&data)?, source_chain)
        .with_table(terminal::render_news(&data))
        .with_warnings(warnings)
        .with_cache_hit(lookup.cache_hit))
}
