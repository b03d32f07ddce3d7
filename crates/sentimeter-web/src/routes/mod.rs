pub mod api;
pub mod health;
pub mod page;

use serde::Deserialize;

use sentimeter_core::Period;

use crate::error::AppResult;
use crate::state::AppState;

/// `symbol` and `period` as sent by the settings form or an API client.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
}

impl DashboardQuery {
    /// Fills blanks from configuration; an unknown period is a bad request.
    pub fn resolve(&self, state: &AppState) -> AppResult<(String, Period)> {
        let symbol = self
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
            .unwrap_or(&state.config.default_symbol)
            .to_owned();

        let period = match self.period.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.parse()?,
            _ => state.config.default_period,
        };

        Ok((symbol, period))
    }
}
