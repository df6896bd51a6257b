//! Barrels page rendering

use axum::{extract::State, http::HeaderMap, response::Html, Extension};
use clochette_core::{Barrel, Drink};
use clochette_utils::escape_html;

use crate::widgets::{form, input, row_actions, section, select, table};
use crate::{ApiResult, AppState, Session};

pub async fn page_barrels(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let drinks = state.backend.drinks(&session.token).await?;
    let fields = render_barrel_fields(&drinks, None, "30", "", "");
    let create = form("/barrels", "#barrels-list", &fields, "Ajouter");
    let inner_content = section("Fûts", "Nouveau fût", &create, "barrels-list", "/barrels/list");
    Ok(Html(crate::page_response(&headers, "Fûts", "/barrels", &session, &inner_content)))
}

pub fn render_barrel_fields(drinks: &[Drink], drink_id: Option<i64>, volume: &str, buy_price: &str, sell_price: &str) -> String {
    let options: Vec<(String, String)> = drinks.iter().map(|d| (d.id.to_string(), d.name.clone())).collect();
    let selected = drink_id.map(|id| id.to_string()).unwrap_or_default();
    format!(
        "{}{}{}{}",
        select("drink_id", "Boisson", &options, &selected),
        input("volume", "Volume (L)", volume, "text"),
        input("buy_price", "Prix d'achat", buy_price, "text"),
        input("sell_price", "Prix du verre", sell_price, "text")
    )
}

fn status_badge(barrel: &Barrel) -> &'static str {
    if barrel.empty {
        "<span class='px-2 py-0.5 rounded-full text-xs bg-gray-100 text-gray-600'>Vide</span>"
    } else if barrel.is_mounted {
        "<span class='px-2 py-0.5 rounded-full text-xs bg-green-100 text-green-700'>Monté</span>"
    } else {
        "<span class='px-2 py-0.5 rounded-full text-xs bg-blue-100 text-blue-700'>En stock</span>"
    }
}

fn mount_button(barrel: &Barrel) -> String {
    if barrel.is_mounted {
        format!(
            "<button hx-post='/barrels/{}/unmount' hx-target='#barrels-list' hx-confirm='Le fût est-il vide ?' class='px-2 py-1 text-sm text-orange-600 hover:underline'>Démonter</button>",
            barrel.id
        )
    } else if !barrel.empty {
        format!(
            "<button hx-post='/barrels/{}/mount' hx-target='#barrels-list' class='px-2 py-1 text-sm text-green-600 hover:underline'>Monter</button>",
            barrel.id
        )
    } else {
        String::new()
    }
}

pub fn render_barrels_list(state: &AppState, barrels: &[Barrel]) -> String {
    let glass_volume = state.config.sale.glass_volume_cl;
    let rows: String = barrels
        .iter()
        .map(|b| {
            format!(
                r#"<tr>
                    <td class='px-4 py-2 font-medium'>{}</td>
                    <td class='px-4 py-2'>{} L</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2 text-gray-500'>~{}</td>
                    <td class='px-4 py-2'>{}</td>
                    <td class='px-4 py-2'><div class='flex justify-end'>{}{}</div></td>
                </tr>"#,
                escape_html(&b.drink_name),
                b.volume.normalize(),
                state.money(b.buy_price),
                state.money(b.sell_price),
                b.glass_capacity(glass_volume),
                status_badge(b),
                mount_button(b),
                row_actions("/barrels", b.id, "#barrels-list", &format!("Supprimer le fût {} ?", b.drink_name))
            )
        })
        .collect();
    table(&["Boisson", "Volume", "Achat", "Verre", "Verres", "État", ""], &rows, "Aucun fût")
}
