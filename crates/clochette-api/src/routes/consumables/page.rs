//! Consumables page rendering

use axum::{http::HeaderMap, response::Html, Extension};
use clochette_core::Consumable;
use clochette_utils::escape_html;

use crate::widgets::{form, input, row_actions, section, table};
use crate::{AppState, Session};

pub async fn page_consumables(Extension(session): Extension<Session>, headers: HeaderMap) -> Html<String> {
    let create = form("/consumables", "#consumables-list", &render_consumable_fields("", "0", "", ""), "Ajouter");
    let inner_content = section(
        "Consommables",
        "Nouveau consommable",
        &create,
        "consumables-list",
        "/consumables/list",
    );
    Html(crate::page_response(&headers, "Consommables", "/consumables", &session, &inner_content))
}

pub fn render_consumable_fields(name: &str, quantity: &str, buy_price: &str, sell_price: &str) -> String {
    format!(
        "{}{}{}{}",
        input("name", "Nom", name, "text"),
        input("quantity", "Quantité en stock", quantity, "number"),
        input("buy_price", "Prix d'achat", buy_price, "text"),
        input("sell_price", "Prix de vente", sell_price, "text")
    )
}

fn stock_cell(consumable: &Consumable, threshold: u32) -> String {
    if consumable.empty {
        "<span class='px-2 py-0.5 rounded-full text-xs bg-gray-100 text-gray-600'>Épuisé</span>".to_string()
    } else if consumable.quantity <= threshold {
        format!("<span class='font-semibold text-orange-600'>{}</span>", consumable.quantity)
    } else {
        consumable.quantity.to_string()
    }
}

pub fn render_consumables_list(state: &AppState, consumables: &[Consumable]) -> String {
    let threshold = state.config.sale.low_stock_threshold;
    let rows: String = consumables
        .iter()
        .map(|c| {
            format!(
                "<tr><td class='px-4 py-2 font-medium'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td></tr>",
                escape_html(&c.name),
                stock_cell(c, threshold),
                state.money(c.buy_price),
                state.money(c.sell_price),
                row_actions("/consumables", c.id, "#consumables-list", &format!("Supprimer {} ?", c.name))
            )
        })
        .collect();
    table(&["Nom", "Stock", "Achat", "Vente", ""], &rows, "Aucun consommable")
}
