//! Non-inventoried items page rendering

use axum::{http::HeaderMap, response::Html, Extension};
use clochette_core::{NonInventoriedItem, Trade};
use clochette_utils::escape_html;

use crate::widgets::{form, input, row_actions, section, select, table};
use crate::{AppState, Session};

pub async fn page_items(Extension(session): Extension<Session>, headers: HeaderMap) -> Html<String> {
    let create = form("/items", "#items-list", &render_item_fields("", Trade::Sell, ""), "Ajouter");
    let inner_content = section("Articles hors stock", "Nouvel article", &create, "items-list", "/items/list");
    Html(crate::page_response(&headers, "Articles hors stock", "/items", &session, &inner_content))
}

pub fn render_item_fields(name: &str, trade: Trade, price: &str) -> String {
    let options: Vec<(String, String)> = Trade::ALL
        .iter()
        .map(|t| (t.to_string(), t.label().to_string()))
        .collect();
    format!(
        "{}{}{}",
        input("name", "Nom", name, "text"),
        select("trade", "Sens", &options, &trade.to_string()),
        input("price", "Prix", price, "text")
    )
}

pub fn render_items_list(state: &AppState, items: &[NonInventoriedItem]) -> String {
    let deposit = &state.config.sale.deposit_item_name;
    let rows: String = items
        .iter()
        .map(|i| {
            let badge = if i.is_deposit(deposit) {
                " <span class='px-2 py-0.5 rounded-full text-xs bg-teal-100 text-teal-700'>consigne</span>"
            } else {
                ""
            };
            format!(
                "<tr><td class='px-4 py-2 font-medium'>{}{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td></tr>",
                escape_html(&i.name),
                badge,
                i.trade.label(),
                state.money(i.price),
                row_actions("/items", i.id, "#items-list", &format!("Supprimer {} ?", i.name))
            )
        })
        .collect();
    table(&["Nom", "Sens", "Prix", ""], &rows, "Aucun article")
}
