//! Point of sale page rendering

use axum::{extract::State, http::HeaderMap, response::Html, Extension};
use clochette_core::{CartItem, PaymentMethod, TransactionKind};
use clochette_utils::{escape_html, html_attr};

use super::api::open_point_of_sale;
use crate::session::PointOfSale;
use crate::widgets::select;
use crate::{ApiResult, AppState, Session};

fn base_path(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Sale => "/sale",
        TransactionKind::Purchase => "/purchase",
    }
}

/// Sale page: resets the sale cart
pub async fn page_sale(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let pos = open_point_of_sale(&state, &session, TransactionKind::Sale).await?;
    let inner_content = render_pos_page(&state, TransactionKind::Sale, &pos);
    Ok(Html(crate::page_response(&headers, "Vente", "/sale", &session, &inner_content)))
}

/// Purchase page: resets the purchase cart
pub async fn page_purchase(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> ApiResult<Html<String>> {
    let pos = open_point_of_sale(&state, &session, TransactionKind::Purchase).await?;
    let inner_content = render_pos_page(&state, TransactionKind::Purchase, &pos);
    Ok(Html(crate::page_response(&headers, "Achat", "/purchase", &session, &inner_content)))
}

fn render_pos_page(state: &AppState, kind: TransactionKind, pos: &PointOfSale) -> String {
    let title = match kind {
        TransactionKind::Sale => "Nouvelle vente",
        TransactionKind::Purchase => "Nouvel achat",
    };
    format!(
        "<div class='mb-6'><h2 class='text-2xl font-bold'>{}</h2></div>{}",
        title,
        render_pos(state, kind, pos)
    )
}

/// `hx-vals` payload identifying an item
fn item_vals(item: &CartItem) -> String {
    let vals = serde_json::json!({
        "item_type": item.item_type.to_string(),
        "name": item.name,
    });
    html_attr(&vals.to_string())
}

fn cart_button(kind: TransactionKind, action: &str, item: &CartItem, text: &str, enabled: bool) -> String {
    format!(
        r#"<button hx-post='{}/cart/{}' hx-vals='{}' hx-target='#pos' hx-swap='outerHTML'{} class='w-8 h-8 rounded-full border text-lg leading-none hover:bg-gray-100 disabled:opacity-30'>{}</button>"#,
        base_path(kind),
        action,
        item_vals(item),
        if enabled { "" } else { " disabled" },
        text
    )
}

fn render_item_card(state: &AppState, kind: TransactionKind, pos: &PointOfSale, item: &CartItem) -> String {
    let quantity = pos.cart.quantity_of(item.item_type, &item.name);
    let at_max = item.max_quantity.is_some_and(|max| quantity >= max);
    let stock = item
        .max_quantity
        .map(|max| format!("<span class='text-xs text-gray-400'>{} en stock</span>", max))
        .unwrap_or_default();
    format!(
        r#"<div class='p-3 rounded-lg border {}'>
            <div class='flex justify-between items-start'>
                <div>
                    <div class='font-medium'>{}</div>
                    <div class='text-sm text-gray-500'>{}</div>
                    {}
                </div>
                <span class='text-xl font-semibold'>{}</span>
            </div>
            <div class='flex gap-2 mt-2'>{}{}{}</div>
        </div>"#,
        if quantity > 0 { "border-indigo-400 bg-indigo-50" } else { "bg-white" },
        escape_html(&item.name),
        state.money(item.unit_price),
        stock,
        quantity,
        cart_button(kind, "decrement", item, "−", quantity > 0),
        cart_button(kind, "increment", item, "+", !at_max),
        cart_button(kind, "reset", item, "0", quantity > 0)
    )
}

fn render_group(state: &AppState, kind: TransactionKind, pos: &PointOfSale, title: &str, items: &[CartItem]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let cards: String = items.iter().map(|item| render_item_card(state, kind, pos, item)).collect();
    format!(
        "<div class='mb-6'><h3 class='font-semibold text-gray-700 mb-2'>{}</h3><div class='grid grid-cols-2 md:grid-cols-3 gap-3'>{}</div></div>",
        title, cards
    )
}

fn render_summary(state: &AppState, kind: TransactionKind, pos: &PointOfSale) -> String {
    let lines: String = pos
        .cart
        .selected()
        .map(|line| {
            format!(
                "<li class='flex justify-between py-1'><span>{} × {}</span><span>{}</span></li>",
                line.quantity,
                escape_html(&line.item.name),
                state.money(line.total())
            )
        })
        .collect();
    let lines = if lines.is_empty() {
        "<li class='py-4 text-center text-gray-500'>Panier vide</li>".to_string()
    } else {
        lines
    };

    let methods: Vec<(String, String)> = PaymentMethod::ALL
        .iter()
        .map(|m| (m.to_string(), m.label().to_string()))
        .collect();
    let submit = match kind {
        TransactionKind::Sale => "Encaisser",
        TransactionKind::Purchase => "Enregistrer l'achat",
    };
    let base = base_path(kind);

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-4 sticky top-4'>
            <h3 class='font-semibold mb-2'>Panier</h3>
            <ul class='divide-y text-sm'>{lines}</ul>
            <div class='flex justify-between border-t mt-2 pt-2 text-lg font-bold'><span>Total</span><span>{total}</span></div>
            <form hx-post='{base}/checkout' hx-target='#pos' hx-swap='outerHTML' class='space-y-3 mt-4'>
                {methods}
                <button type='submit'{disabled} class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700 disabled:opacity-40'>{submit}</button>
            </form>
            <button hx-post='{base}/cart/clear' hx-target='#pos' hx-swap='outerHTML' class='w-full mt-2 px-4 py-2 text-sm text-gray-600 hover:underline'>Vider le panier</button>
        </div>"#,
        lines = lines,
        total = state.money(pos.cart.total()),
        base = base,
        methods = select("payment_method", "Moyen de paiement", &methods, &PaymentMethod::Cash.to_string()),
        disabled = if pos.cart.is_empty() { " disabled" } else { "" },
        submit = submit
    )
}

/// The `#pos` fragment: catalog cards and cart summary
pub fn render_pos(state: &AppState, kind: TransactionKind, pos: &PointOfSale) -> String {
    let catalog = &pos.catalog;
    let first_title = match kind {
        TransactionKind::Sale => "Pression",
        TransactionKind::Purchase => "Fûts",
    };
    let groups = format!(
        "{}{}{}",
        render_group(state, kind, pos, first_title, &catalog.glasses),
        render_group(state, kind, pos, "Consommables", &catalog.consumables),
        render_group(state, kind, pos, "Autres articles", &catalog.non_inventoried)
    );
    let groups = if groups.is_empty() {
        "<p class='text-gray-500'>Aucun article disponible</p>".to_string()
    } else {
        groups
    };
    let deposit_note = match catalog.deposit.as_ref() {
        Some(deposit) if kind == TransactionKind::Sale => format!(
            "<p class='text-xs text-gray-500 mb-4'>Chaque verre ajoute un {}.</p>",
            escape_html(&deposit.name)
        ),
        _ => String::new(),
    };

    format!(
        r#"<div id='pos' class='grid grid-cols-1 lg:grid-cols-3 gap-6'>
            <div class='lg:col-span-2'>{}{}</div>
            <div>{}</div>
        </div>"#,
        deposit_note,
        groups,
        render_summary(state, kind, pos)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clochette_core::ItemType;

    #[test]
    fn test_item_vals_are_attribute_safe() {
        let item = CartItem {
            item_type: ItemType::Consumable,
            item_id: 1,
            name: "Kinder's".to_string(),
            unit_price: rust_decimal::Decimal::ONE,
            max_quantity: None,
        };
        let vals = item_vals(&item);
        assert!(!vals.contains('\''));
        assert!(vals.contains("&quot;consumable&quot;"));
    }
}
