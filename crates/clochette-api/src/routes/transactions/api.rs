//! Transactions HTMX endpoints

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use chrono::{Local, NaiveDate};
use clochette_core::time::TimeFilter;
use clochette_core::{Id, TimeContext, Transaction};

use super::page::{render_transaction_detail, render_transactions_list};
use crate::routes::time::RangeQuery;
use crate::widgets::modal;
use crate::{ApiResult, AppState, Session};

/// Transactions fetched per backend call
const BATCH_SIZE: usize = 200;
/// Upper bound on backend calls for one report
const MAX_BATCHES: usize = 50;

/// Every transaction of the period, newest first.
///
/// The backend lists newest first, so paging stops at the first
/// transaction older than the period start.
pub(crate) async fn transactions_in_range(state: &AppState, session: &Session, context: &TimeContext) -> ApiResult<Vec<Transaction>> {
    let today = Local::now().date_naive();
    let (start, _) = context.bounds_at(today);
    let mut selected = Vec::new();

    for batch_index in 0..MAX_BATCHES {
        let batch = state
            .backend
            .transactions(&session.token, BATCH_SIZE, batch_index * BATCH_SIZE)
            .await?;
        let exhausted = batch.len() < BATCH_SIZE;
        let reached_start = batch
            .last()
            .is_some_and(|tx| before(start, tx.datetime.date()));

        selected.extend(batch.into_iter().filter(|tx| tx.filter_by_time(context, today)));

        if exhausted || reached_start {
            return Ok(selected);
        }
    }

    log::warn!("Transaction history truncated after {} records", MAX_BATCHES * BATCH_SIZE);
    Ok(selected)
}

fn before(start: Option<NaiveDate>, date: NaiveDate) -> bool {
    start.is_some_and(|start| date < start)
}

/// Slice of `items` shown on 1-based `page`, with the page count
pub(crate) fn paginate<T>(items: &[T], page: usize, per_page: usize) -> (&[T], usize) {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(items.len());
    (&items[start.min(end)..end], total_pages)
}

/// HTMX: Transactions list for a period and page
pub async fn htmx_transactions_list(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Html<String>> {
    let context = query.context(&state.config);
    let transactions = transactions_in_range(&state, &session, &context).await?;
    Ok(Html(render_transactions_list(&state, &transactions, &context, query.page())))
}

/// HTMX: Detail modal
pub async fn htmx_transaction_detail(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    let transaction = state.backend.transaction(&session.token, id).await?;
    let title = format!("{} n°{}", transaction.kind.label(), transaction.id);
    Ok(Html(modal(&title, &render_transaction_detail(&state, &transaction))))
}
