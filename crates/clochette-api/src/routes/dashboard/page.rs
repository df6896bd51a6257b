//! Dashboard page rendering

use axum::{extract::State, http::HeaderMap, response::Html, Extension};
use chrono::Local;
use clochette_core::{DashboardSummary, TimeContext};
use clochette_utils::escape_html;

use crate::routes::transactions::transactions_in_range;
use crate::routes::treasury::page::render_balances;
use crate::{ApiResult, AppState, Session};

/// Dashboard: treasury, taps, stock alerts and recent activity
pub async fn page_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let context = TimeContext::new(state.config.time_range.default_range);
    let token = &session.token;
    let treasury = state.backend.treasury(token).await?;
    let barrels = state.backend.barrels(token).await?;
    let consumables = state.backend.consumables(token).await?;
    let transactions = transactions_in_range(&state, &session, &context).await?;

    let summary = DashboardSummary::build(
        treasury,
        barrels,
        &consumables,
        transactions,
        &context,
        state.config.sale.low_stock_threshold,
        Local::now().date_naive(),
    );

    let inner_content = format!(
        r#"<div class='mb-6'>
            <h2 class='text-2xl font-bold'>Bonjour {}</h2>
            <p class='text-gray-500'>{} : {} ventes, {} achats, solde {}</p>
        </div>
        {}
        <div class='grid grid-cols-1 lg:grid-cols-3 gap-6'>
            {}
            {}
            {}
        </div>"#,
        escape_html(&session.account.display_name()),
        summary.period.description,
        state.money(summary.period.sales_total),
        state.money(summary.period.purchases_total),
        state.money(summary.period.net),
        render_balances(&state, &summary.treasury),
        render_taps(&state, &summary),
        render_alerts(&summary),
        render_recent(&state, &summary)
    );
    Ok(Html(crate::page_response(&headers, "Tableau de bord", "/", &session, &inner_content)))
}

fn card(title: &str, body: &str) -> String {
    format!(
        "<div class='bg-white rounded-xl shadow-sm p-6'><h3 class='font-semibold mb-3'>{}</h3>{}</div>",
        title, body
    )
}

fn render_taps(state: &AppState, summary: &DashboardSummary) -> String {
    if summary.mounted_barrels.is_empty() {
        return card("À la pression", "<p class='text-gray-500 text-sm'>Aucun fût monté</p>");
    }
    let items: String = summary
        .mounted_barrels
        .iter()
        .map(|b| {
            format!(
                "<li class='flex justify-between py-1'><span>{}</span><span class='text-gray-500'>{}</span></li>",
                escape_html(&b.drink_name),
                state.money(b.sell_price)
            )
        })
        .collect();
    card("À la pression", &format!("<ul class='divide-y'>{}</ul>", items))
}

fn render_alerts(summary: &DashboardSummary) -> String {
    if summary.stock_alerts.is_empty() {
        return card("Stock bas", "<p class='text-gray-500 text-sm'>Rien à signaler</p>");
    }
    let items: String = summary
        .stock_alerts
        .iter()
        .map(|a| {
            format!(
                "<li class='flex justify-between py-1'><span>{}</span><span class='font-semibold text-orange-600'>{}</span></li>",
                escape_html(&a.name),
                a.quantity
            )
        })
        .collect();
    card("Stock bas", &format!("<ul class='divide-y'>{}</ul>", items))
}

fn render_recent(state: &AppState, summary: &DashboardSummary) -> String {
    if summary.recent_transactions.is_empty() {
        return card("Dernières transactions", "<p class='text-gray-500 text-sm'>Aucune transaction</p>");
    }
    let items: String = summary
        .recent_transactions
        .iter()
        .map(|tx| {
            format!(
                "<li class='flex justify-between py-1 cursor-pointer' hx-get='/transactions/{}/detail' hx-target='#modal'><span class='text-sm'>{} · {}</span><span>{}</span></li>",
                tx.id,
                tx.datetime.format("%d/%m %H:%M"),
                escape_html(&tx.summary()),
                state.money(tx.signed_amount())
            )
        })
        .collect();
    card(
        "Dernières transactions",
        &format!("<ul class='divide-y'>{}</ul><a href='/transactions' class='block mt-3 text-sm text-indigo-600 hover:underline'>Tout voir</a>", items),
    )
}
