//! Point of sale HTMX and JSON endpoints

use axum::{
    extract::{Path, State},
    response::{Html, Json},
    Extension, Form,
};
use clochette_core::forms::CheckoutForm;
use clochette_core::{Cart, CartAction, CartLine, Catalog, ItemType, TransactionKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::page::render_pos;
use crate::error::success_toast;
use crate::session::{prune_idle, PointOfSale};
use crate::{ApiError, ApiResult, AppState, Session};

/// Item targeted by a cart action
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CartItemForm {
    pub item_type: String,
    pub name: String,
}

/// Fetch what can be sold or bought right now
async fn load_catalog(state: &AppState, session: &Session, kind: TransactionKind) -> ApiResult<Catalog> {
    let backend = &state.backend;
    let token = &session.token;
    let barrels = backend.barrels(token).await?;
    let consumables = backend.consumables(token).await?;
    let items = backend.non_inventoried_items(token).await?;

    Ok(match kind {
        TransactionKind::Sale => Catalog::for_sale(&barrels, &consumables, &items, &state.config.sale),
        TransactionKind::Purchase => {
            let drinks = backend.drinks(token).await?;
            Catalog::for_purchase(&drinks, &barrels, &consumables, &items)
        }
    })
}

/// Start a fresh cart against the current catalog and store it
pub(crate) async fn open_point_of_sale(state: &AppState, session: &Session, kind: TransactionKind) -> ApiResult<PointOfSale> {
    let catalog = load_catalog(state, session, kind).await?;
    let cart = match kind {
        TransactionKind::Sale => Cart::sale(catalog.deposit.clone()),
        TransactionKind::Purchase => Cart::purchase(),
    };
    let pos = PointOfSale { cart, catalog };

    let now = Instant::now();
    let mut carts = state.carts.write().await;
    let pruned = prune_idle(&mut carts, now, Duration::from_secs(state.config.session.max_age_secs));
    if pruned > 0 {
        log::debug!("Dropped carts of {} idle sessions", pruned);
    }
    let entry = carts.entry(session.key()).or_default();
    entry.touch(now);
    *entry.slot(kind) = Some(pos.clone());
    Ok(pos)
}

fn reload_required() -> ApiError {
    ApiError::BadRequest {
        message: "Le panier a expiré, rechargez la page".to_string(),
    }
}

async fn cart_action(
    state: &AppState,
    session: &Session,
    kind: TransactionKind,
    action: &str,
    input: &CartItemForm,
) -> ApiResult<Html<String>> {
    let mut carts = state.carts.write().await;
    let entry = carts.get_mut(&session.key()).ok_or_else(reload_required)?;
    entry.touch(Instant::now());
    let pos = entry.slot(kind).as_mut().ok_or_else(reload_required)?;

    if action == "clear" {
        pos.cart.clear();
    } else {
        let action: CartAction = action.parse().map_err(|message| ApiError::BadRequest { message })?;
        let item_type: ItemType = input.item_type.parse().map_err(|message| ApiError::BadRequest { message })?;
        let item = pos.catalog.find(item_type, &input.name).cloned().ok_or_else(|| ApiError::NotFound {
            resource: format!("article {}", input.name),
        })?;
        let delta = pos.cart.apply(action, &item);
        log::debug!("{} cart: {} {} ({:+})", kind, item_type, item.name, delta);
    }

    Ok(Html(render_pos(state, kind, pos)))
}

async fn checkout(state: &AppState, session: &Session, kind: TransactionKind, input: &CheckoutForm) -> ApiResult<Html<String>> {
    let payment_method = input.validate()?;
    // Snapshot the cart so the lock is not held across the backend call
    let cart = {
        let carts = state.carts.read().await;
        carts
            .get(&session.key())
            .and_then(|c| c.get(kind))
            .map(|pos| pos.cart.clone())
            .ok_or_else(reload_required)?
    };
    let transaction = cart.to_transaction(payment_method)?;
    let recorded = state.backend.create_transaction(&session.token, &transaction).await?;
    log::info!(
        "{} {} recorded by {}: {} via {}",
        kind,
        recorded.id,
        session.account.username,
        recorded.amount,
        payment_method
    );

    // Stock and mounted barrels may have changed
    let pos = open_point_of_sale(state, session, kind).await?;
    let message = match kind {
        TransactionKind::Sale => format!("Vente enregistrée : {}", state.money(recorded.amount)),
        TransactionKind::Purchase => format!("Achat enregistré : {}", state.money(recorded.amount)),
    };
    Ok(Html(format!("{}{}", render_pos(state, kind, &pos), success_toast(&message))))
}

/// HTMX: increment, decrement, reset or clear the sale cart
pub async fn htmx_sale_cart(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(action): Path<String>,
    Form(input): Form<CartItemForm>,
) -> ApiResult<Html<String>> {
    cart_action(&state, &session, TransactionKind::Sale, &action, &input).await
}

pub async fn htmx_purchase_cart(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(action): Path<String>,
    Form(input): Form<CartItemForm>,
) -> ApiResult<Html<String>> {
    cart_action(&state, &session, TransactionKind::Purchase, &action, &input).await
}

pub async fn htmx_sale_checkout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<CheckoutForm>,
) -> ApiResult<Html<String>> {
    checkout(&state, &session, TransactionKind::Sale, &input).await
}

pub async fn htmx_purchase_checkout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<CheckoutForm>,
) -> ApiResult<Html<String>> {
    checkout(&state, &session, TransactionKind::Purchase, &input).await
}

/// Cart contents as JSON
#[derive(Debug, Serialize)]
pub struct CartSnapshot {
    pub kind: TransactionKind,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub formatted_total: String,
}

async fn snapshot(state: &AppState, session: &Session, kind: TransactionKind) -> CartSnapshot {
    let carts = state.carts.read().await;
    let lines: Vec<CartLine> = carts
        .get(&session.key())
        .and_then(|c| c.get(kind))
        .map(|pos| pos.cart.selected().cloned().collect())
        .unwrap_or_default();
    let total = clochette_core::pricing::cart_total(&lines);
    CartSnapshot {
        kind,
        lines,
        total,
        formatted_total: state.money(total),
    }
}

/// API: Sale cart
pub async fn api_sale_cart(State(state): State<AppState>, Extension(session): Extension<Session>) -> Json<CartSnapshot> {
    Json(snapshot(&state, &session, TransactionKind::Sale).await)
}

/// API: Purchase cart
pub async fn api_purchase_cart(State(state): State<AppState>, Extension(session): Extension<Session>) -> Json<CartSnapshot> {
    Json(snapshot(&state, &session, TransactionKind::Purchase).await)
}
