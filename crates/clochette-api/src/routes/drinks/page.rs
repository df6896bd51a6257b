//! Drinks page rendering

use axum::{http::HeaderMap, response::Html, Extension};
use clochette_core::Drink;
use clochette_utils::escape_html;

use crate::widgets::{form, input, row_actions, section, table};
use crate::Session;

pub async fn page_drinks(Extension(session): Extension<Session>, headers: HeaderMap) -> Html<String> {
    let create = form("/drinks", "#drinks-list", &render_drink_fields("", ""), "Ajouter");
    let inner_content = section("Boissons", "Nouvelle boisson", &create, "drinks-list", "/drinks/list");
    Html(crate::page_response(&headers, "Boissons", "/drinks", &session, &inner_content))
}

pub fn render_drink_fields(name: &str, description: &str) -> String {
    format!(
        "{}{}",
        input("name", "Nom", name, "text"),
        input("description", "Description", description, "text")
    )
}

pub fn render_drinks_list(drinks: &[Drink]) -> String {
    let rows: String = drinks
        .iter()
        .map(|d| {
            format!(
                "<tr><td class='px-4 py-2 font-medium'>{}</td><td class='px-4 py-2 text-gray-500'>{}</td><td class='px-4 py-2'>{}</td></tr>",
                escape_html(&d.name),
                escape_html(d.description.as_deref().unwrap_or("")),
                row_actions("/drinks", d.id, "#drinks-list", &format!("Supprimer {} ?", d.name))
            )
        })
        .collect();
    table(&["Nom", "Description", ""], &rows, "Aucune boisson")
}
