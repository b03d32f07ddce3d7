use sentimeter_core::envelope::MARKET_UNAVAILABLE_CODE;
use sentimeter_core::{
    CacheMode, DashboardConfig, DashboardReport, DashboardService, EnvelopeError, MarketPanel,
    SentimentPanel,
};

use crate::cli::DashboardArgs;
use crate::error::CliError;
use crate::output::terminal;

use super::CommandResult;

pub async fn run(
    args: &DashboardArgs,
    config: &DashboardConfig,
    service: &DashboardService,
    mode: CacheMode,
) -> Result<CommandResult, CliError> {
    let symbol = args.symbol.as_deref().unwrap_or(&config.default_symbol);
    let period = args.period.unwrap_or(config.default_period);

    let report = service.run_with_mode(symbol, period, mode).await;
    to_result(&report)
}

fn to_result(report: &DashboardReport) -> Result<CommandResult, CliError> {
    let mut warnings = report.warnings.clone();
    if let Some(SentimentPanel::NoNews { warning }) = &report.sentiment {
        warnings.push(warning.clone());
    }

    let mut result = CommandResult::ok(serde_json::to_value(report)?, report.source_chain.clone())
        .with_table(terminal::render_dashboard(report))
        .with_warnings(warnings)
        .with_cache_hit(report.cache_hit);

    if let MarketPanel::Unavailable { message, .. } = &report.market {
        let mut error = EnvelopeError::new(MARKET_UNAVAILABLE_CODE, message.clone())?;
        if let Some(provider) = report.source_chain.first() {
            error = error.with_source(*provider);
        }
        result = result.with_error(error);
    }

    Ok(result)
}
