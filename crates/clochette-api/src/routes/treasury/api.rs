//! Treasury JSON endpoint

use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::Local;
use clochette_core::{PeriodSummary, TimeContext, Treasury};
use serde::Serialize;

use crate::routes::time::RangeQuery;
use crate::routes::transactions::transactions_in_range;
use crate::{ApiResult, AppState, Session};

#[derive(Debug, Serialize)]
pub struct TreasuryReport {
    pub treasury: Treasury,
    pub period: PeriodSummary,
}

/// Balances plus the summary of the selected period
pub(crate) async fn treasury_report(state: &AppState, session: &Session, context: &TimeContext) -> ApiResult<TreasuryReport> {
    let treasury = state.backend.treasury(&session.token).await?;
    let transactions = transactions_in_range(state, session, context).await?;
    let period = PeriodSummary::from_transactions(&transactions, context, Local::now().date_naive());
    Ok(TreasuryReport { treasury, period })
}

/// API: Treasury balances and period summary
pub async fn api_treasury(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<TreasuryReport>> {
    let context = query.context(&state.config);
    Ok(Json(treasury_report(&state, &session, &context).await?))
}
