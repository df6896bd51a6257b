//! Settings page rendering - Read-only configuration

use axum::{extract::State, http::HeaderMap, response::Html, Extension};
use clochette_config::SymbolPosition;
use clochette_utils::escape_html;
use rust_decimal::Decimal;

use crate::{AppState, Session};

fn block(title: &str, entries: &[(&str, String)]) -> String {
    let cells: String = entries
        .iter()
        .map(|(label, value)| {
            format!(
                "<div><p class='text-sm text-gray-500'>{}</p><p class='font-medium'>{}</p></div>",
                label,
                escape_html(value)
            )
        })
        .collect();
    format!(
        "<div class='bg-white rounded-xl shadow-sm p-6 mb-6'><h3 class='text-lg font-semibold mb-4'>{}</h3><div class='grid grid-cols-2 gap-4'>{}</div></div>",
        title, cells
    )
}

fn yes_no(value: bool) -> String {
    let text = if value { "Oui" } else { "Non" };
    text.to_string()
}

pub async fn page_settings(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Html<String> {
    let config = &state.config;

    let inner_content = format!(
        "<div class='mb-6'><h2 class='text-2xl font-bold'>Paramètres</h2></div>{}{}{}{}{}",
        block(
            "Serveur",
            &[
                ("Hôte", config.server.host.clone()),
                ("Port", config.server.port.to_string()),
                ("Niveau de journalisation", config.logging.level.clone()),
            ]
        ),
        block(
            "API",
            &[
                ("Adresse", config.backend.base_url.clone()),
                ("Délai", format!("{} s", config.backend.timeout_secs)),
                ("Connexion", config.backend.login_path.clone()),
            ]
        ),
        block(
            "Session",
            &[
                ("Cookie", config.session.cookie_name.clone()),
                ("Secure", yes_no(config.session.secure)),
                ("Durée", format!("{} h", config.session.max_age_secs / 3600)),
            ]
        ),
        block(
            "Affichage",
            &[
                ("Lignes par page", config.pagination.records_per_page.to_string()),
                ("Période par défaut", config.time_range.default_range.to_string()),
                ("Devise", config.currency.default_currency.clone()),
                (
                    "Symbole",
                    match config.currency.symbol_position {
                        SymbolPosition::Before => format!("{} avant", config.currency.symbol),
                        SymbolPosition::After => format!("{} après", config.currency.symbol),
                    },
                ),
                ("Exemple", state.money(Decimal::new(123_450, 2))),
            ]
        ),
        block(
            "Vente",
            &[
                ("Consigne", config.sale.deposit_item_name.clone()),
                ("Seuil de stock bas", config.sale.low_stock_threshold.to_string()),
                ("Volume d'un verre", format!("{} cl", config.sale.glass_volume_cl)),
            ]
        )
    );

    Html(crate::page_response(&headers, "Paramètres", "/settings", &session, &inner_content))
}
