mod dashboard;
pub mod interactive;
pub mod news;
mod prices;
pub mod score;

use std::time::Instant;

use sentimeter_core::{
    CacheMode, DashboardConfig, DashboardService, Envelope, EnvelopeError, ProviderId,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    /// Pre-rendered terminal layout for `--format table`.
    pub table: Option<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub cache_hit: bool,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            table: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            cache_hit: false,
            source_chain,
        }
    }

    pub fn with_table(mut self, table: String) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

/// Environment settings with command-line overrides applied.
pub fn resolve_config(cli: &Cli) -> Result<DashboardConfig, CliError> {
    let mut config = DashboardConfig::from_env()?;
    if cli.mock {
        config = config.with_mock(true);
    }
    if let Some(model) = cli.model {
        config = config.with_sentiment_model(model);
    }
    Ok(config)
}

pub fn cache_mode(cli: &Cli) -> CacheMode {
    if cli.no_cache {
        CacheMode::Bypass
    } else {
        CacheMode::Use
    }
}

/// Runs a one-shot command and wraps its result in an envelope.
pub async fn run(
    cli: &Cli,
    config: &DashboardConfig,
    service: &DashboardService,
) -> Result<(Envelope<Value>, Option<String>), CliError> {
    let mode = cache_mode(cli);
    let started = Instant::now();

    let result = match &cli.command {
        Command::Dashboard(args) => dashboard::run(args, config, service, mode).await?,
        Command::Prices(args) => prices::run(args, config, service, mode).await?,
        Command::News(args) => news::run(args, service, mode).await?,
        Command::Score(args) => score::run(args, service)?,
        Command::Interactive(_) => {
            return Err(CliError::Command(String::from(
                "interactive sessions do not produce an envelope",
            )))
        }
    };
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let CommandResult {
        data,
        table,
        warnings,
        errors,
        cache_hit,
        source_chain,
    } = result;

    let mut metadata = Metadata::new(source_chain, latency_ms, cache_hit)?;
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    let envelope = Envelope::with_errors(meta, data, errors)?;
    Ok((envelope, table))
}
