//! Browser-facing routes.
//!
//! - `GET /` renders the dashboard for `?symbol=&period=`
//! - `POST /refresh` clears caches and redirects back to `/`

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::Form;

use crate::error::{AppError, AppResult};
use crate::html;
use crate::state::AppState;

use super::DashboardQuery;

pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Html<String>> {
    let (symbol, period) = query.resolve(&state)?;
    let report = state.service.run(&symbol, period).await;
    let page = html::render_page(&report).map_err(|error| AppError::Internal(error.to_string()))?;
    Ok(Html(page))
}

pub async fn refresh(
    State(state): State<AppState>,
    Form(form): Form<DashboardQuery>,
) -> AppResult<Redirect> {
    let (symbol, period) = form.resolve(&state)?;
    state.service.clear().await;
    tracing::info!(%symbol, %period, "refresh requested");

    Ok(Redirect::to(&format!(
        "/?symbol={}&period={period}",
        urlencoding::encode(&symbol)
    )))
}
