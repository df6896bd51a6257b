//! Treasury page rendering

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Html,
    Extension,
};
use clochette_core::{PaymentMethod, PeriodSummary, Treasury};

use super::api::treasury_report;
use crate::routes::time::{range_selector, RangeQuery};
use crate::widgets::table;
use crate::{ApiResult, AppState, Session};

pub async fn page_treasury(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Html<String>> {
    let context = query.context(&state.config);
    let report = treasury_report(&state, &session, &context).await?;

    let inner_content = format!(
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Trésorerie</h2></div>
        {}
        {}
        {}"#,
        range_selector(&context, "/treasury"),
        render_balances(&state, &report.treasury),
        render_period(&state, &report.period)
    );
    Ok(Html(crate::page_response(&headers, "Trésorerie", "/treasury", &session, &inner_content)))
}

/// Balance cards: total then one per payment method
pub fn render_balances(state: &AppState, treasury: &Treasury) -> String {
    let methods: String = PaymentMethod::ALL
        .iter()
        .map(|m| {
            format!(
                "<div class='bg-white p-4 rounded-xl shadow-sm'><p class='text-sm text-gray-500'>{}</p><p class='text-xl font-semibold'>{}</p></div>",
                m.label(),
                state.money(treasury.amount_for(*m))
            )
        })
        .collect();
    format!(
        r#"<div class='grid grid-cols-2 md:grid-cols-4 gap-4 mb-6'>
            <div class='bg-indigo-600 text-white p-4 rounded-xl shadow-sm'><p class='text-sm opacity-80'>Total</p><p class='text-2xl font-bold'>{}</p></div>
            {}
        </div>"#,
        state.money(treasury.total_amount),
        methods
    )
}

fn render_period(state: &AppState, period: &PeriodSummary) -> String {
    let rows: String = period
        .by_method
        .iter()
        .map(|m| {
            format!(
                "<tr><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-green-600'>{}</td><td class='px-4 py-2 text-red-600'>{}</td><td class='px-4 py-2 font-medium'>{}</td></tr>",
                m.payment_method.label(),
                state.money(m.sales),
                state.money(m.purchases),
                state.money(m.sales - m.purchases)
            )
        })
        .collect();
    let net_color = if period.net.is_sign_negative() { "text-red-600" } else { "text-green-600" };

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='font-semibold mb-4'>{}</h3>
            <div class='grid grid-cols-2 md:grid-cols-4 gap-4 mb-6'>
                <div><p class='text-sm text-gray-500'>Ventes</p><p class='text-lg font-semibold text-green-600'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Achats</p><p class='text-lg font-semibold text-red-600'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Solde</p><p class='text-lg font-semibold {}'>{}</p></div>
                <div><p class='text-sm text-gray-500'>Transactions</p><p class='text-lg font-semibold'>{}</p></div>
            </div>
            {}
        </div>"#,
        period.description,
        state.money(period.sales_total),
        state.money(period.purchases_total),
        net_color,
        state.money(period.net),
        period.transaction_count,
        table(&["Moyen", "Ventes", "Achats", "Solde"], &rows, "")
    )
}
