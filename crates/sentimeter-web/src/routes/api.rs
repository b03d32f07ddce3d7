use axum::extract::{Query, State};
use axum::Json;

use sentimeter_core::{DashboardReport, MarketPanel};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::DashboardQuery;

/// `GET /api/dashboard`: the full report as JSON, or 503 when no price data is available.
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<DashboardReport>> {
    let (symbol, period) = query.resolve(&state)?;
    let report = state.service.run(&symbol, period).await;

    if let MarketPanel::Unavailable { message, .. } = &report.market {
        return Err(AppError::Unavailable(message.clone()));
    }
    Ok(Json(report))
}
