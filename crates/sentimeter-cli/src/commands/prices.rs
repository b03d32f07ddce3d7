use sentimeter_core::dashboard::unavailable_message;
use sentimeter_core::envelope::MARKET_UNAVAILABLE_CODE;
use sentimeter_core::{
    CacheMode, DashboardConfig, DashboardService, EnvelopeError, MarketData, Symbol,
};

use crate::cli::PricesArgs;
use crate::error::CliError;
use crate::output::terminal;

use super::CommandResult;

pub async fn run(
    args: &PricesArgs,
    config: &DashboardConfig,
    service: &DashboardService,
    mode: CacheMode,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = args.period.unwrap_or(config.default_period);
    let provider = service.market().provider();

    let lookup = service.market().fetch_with_mode(&symbol, period, mode).await;
    let data = serde_json::to_value(&lookup.value)?;
    let table = terminal::render_prices(&symbol, period, &lookup.value);

    let mut result = CommandResult::ok(data, vec![provider])
        .with_table(table)
        .with_cache_hit(lookup.cache_hit);

    match lookup.value {
        MarketData::Available(snapshot) => {
            result = result.with_warnings(snapshot.warnings);
        }
        MarketData::Unavailable { reason } => {
            tracing::warn!(%symbol, %period, %reason, "price history unavailable");
            let error = EnvelopeError::new(
                MARKET_UNAVAILABLE_CODE,
                unavailable_message(symbol.as_str()),
            )?
            .with_source(provider);
            result = result.with_error(error);
        }
    }

    Ok(result)
}
