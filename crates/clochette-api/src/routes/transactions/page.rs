//! Transactions page rendering

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
    Extension,
};
use clochette_core::{TimeContext, Transaction, TransactionKind};
use clochette_utils::escape_html;

use super::api::paginate;
use crate::routes::time::{range_param, range_selector, RangeQuery};
use crate::widgets::table;
use crate::{AppState, Session};

/// Transactions page: period selector and a list loaded on display
pub async fn page_transactions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> Html<String> {
    let context = query.context(&state.config);
    let list_url = format!("/transactions/list?{}&page={}", range_param(&context), query.page());

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Transactions</h2></div>
        {}
        <div id='transactions-content' hx-get='{}' hx-trigger='load' class='bg-white rounded-xl shadow-sm p-6'>
            <p class='text-gray-500 text-center'>Chargement...</p>
        </div>"#,
        range_selector(&context, "/transactions"),
        escape_html(&list_url)
    );
    Html(crate::page_response(&headers, "Transactions", "/transactions", &session, &inner_content))
}

fn kind_badge(kind: TransactionKind) -> String {
    let color = match kind {
        TransactionKind::Sale => "bg-green-100 text-green-700",
        TransactionKind::Purchase => "bg-orange-100 text-orange-700",
    };
    format!("<span class='px-2 py-0.5 rounded-full text-xs {}'>{}</span>", color, kind.label())
}

fn signed_amount(state: &AppState, tx: &Transaction) -> String {
    let color = match tx.kind {
        TransactionKind::Sale => "text-green-600",
        TransactionKind::Purchase => "text-red-600",
    };
    format!("<span class='font-medium {}'>{}</span>", color, state.money(tx.signed_amount()))
}

fn page_button(context: &TimeContext, page: usize, label: &str, enabled: bool) -> String {
    format!(
        "<button hx-get='/transactions/list?{}&page={}' hx-target='#transactions-content'{} class='px-3 py-1 border rounded hover:bg-gray-100 disabled:opacity-40'>{}</button>",
        escape_html(&range_param(context)),
        page,
        if enabled { "" } else { " disabled" },
        label
    )
}

/// List fragment for `#transactions-content`
pub fn render_transactions_list(state: &AppState, transactions: &[Transaction], context: &TimeContext, page: usize) -> String {
    let per_page = state.config.pagination.records_per_page;
    let (shown, total_pages) = paginate(transactions, page, per_page);
    let page = page.clamp(1, total_pages);

    let rows: String = shown
        .iter()
        .map(|tx| {
            format!(
                r#"<tr class='hover:bg-gray-50 cursor-pointer' hx-get='/transactions/{}/detail' hx-target='#modal'>
                    <td class='px-4 py-2 text-sm text-gray-600'>{}</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2 text-sm'>{}</td>
                    <td class='px-4 py-2 text-sm text-gray-500'>{}</td>
                    <td class='px-4 py-2 text-right'>{}</td>
                </tr>"#,
                tx.id,
                tx.datetime.format("%d/%m/%Y %H:%M"),
                kind_badge(tx.kind),
                escape_html(&tx.summary()),
                tx.payment_method.label(),
                escape_html(&tx.author),
                signed_amount(state, tx)
            )
        })
        .collect();

    format!(
        r#"{}
        <div class='flex items-center justify-between mt-4'>
            <span class='text-sm text-gray-500'>{} transaction(s)</span>
            <div class='flex items-center gap-2'>
                {}
                <span class='text-sm text-gray-600'>Page {} / {}</span>
                {}
            </div>
        </div>"#,
        table(&["Date", "Type", "Articles", "Paiement", "Auteur", "Montant"], &rows, "Aucune transaction sur la période"),
        transactions.len(),
        page_button(context, page.saturating_sub(1), "Précédente", page > 1),
        page,
        total_pages,
        page_button(context, page + 1, "Suivante", page < total_pages)
    )
}

/// Body of the detail modal
pub fn render_transaction_detail(state: &AppState, tx: &Transaction) -> String {
    let rows: String = tx
        .items
        .iter()
        .map(|item| {
            format!(
                "<tr><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-sm text-gray-500'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-right'>{}</td></tr>",
                escape_html(&item.name),
                item.item_type.label(),
                item.quantity,
                state.money(item.unit_price),
                state.money(item.total())
            )
        })
        .collect();
    let description = tx
        .description
        .as_deref()
        .map(|d| format!("<p class='text-sm text-gray-600 mb-3'>{}</p>", escape_html(d)))
        .unwrap_or_default();

    format!(
        r#"<dl class='grid grid-cols-2 gap-2 text-sm mb-4'>
            <dt class='text-gray-500'>Date</dt><dd>{}</dd>
            <dt class='text-gray-500'>Paiement</dt><dd>{}</dd>
            <dt class='text-gray-500'>Auteur</dt><dd>{}</dd>
            <dt class='text-gray-500'>Montant</dt><dd>{}</dd>
        </dl>
        {}
        {}"#,
        tx.datetime.format("%d/%m/%Y %H:%M"),
        tx.payment_method.label(),
        escape_html(&tx.author),
        signed_amount(state, tx),
        description,
        table(&["Article", "Type", "Qté", "Prix", "Total"], &rows, "Aucun article")
    )
}
