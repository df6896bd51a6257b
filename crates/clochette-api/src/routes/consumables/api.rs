//! Consumables HTMX endpoints

use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Form,
};
use clochette_core::forms::ConsumableForm;
use clochette_core::Id;

use super::page::{render_consumable_fields, render_consumables_list};
use crate::error::success_toast;
use crate::widgets::{close_modal, form, modal};
use crate::{ApiError, ApiResult, AppState, Session};

async fn list_fragment(state: &AppState, session: &Session) -> ApiResult<String> {
    let mut consumables = state.backend.consumables(&session.token).await?;
    consumables.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(render_consumables_list(state, &consumables))
}

/// HTMX: Consumables list
pub async fn htmx_consumables_list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Html<String>> {
    Ok(Html(list_fragment(&state, &session).await?))
}

pub async fn htmx_consumable_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<ConsumableForm>,
) -> ApiResult<Html<String>> {
    let consumable = input.validate()?;
    let created = state.backend.create_consumable(&session.token, &consumable).await?;
    log::info!("Consumable {} created by {}", created.id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&format!("« {} » ajouté", created.name)))))
}

pub async fn htmx_consumable_edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    let consumables = state.backend.consumables(&session.token).await?;
    let consumable = consumables.iter().find(|c| c.id == id).ok_or_else(|| ApiError::NotFound {
        resource: format!("consommable {}", id),
    })?;

    let fields = render_consumable_fields(
        &consumable.name,
        &consumable.quantity.to_string(),
        &consumable.buy_price.to_string(),
        &consumable.sell_price.to_string(),
    );
    let body = form(&format!("/consumables/{}", id), "#consumables-list", &fields, "Enregistrer");
    Ok(Html(modal(&format!("Modifier {}", consumable.name), &body)))
}

pub async fn htmx_consumable_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
    Form(input): Form<ConsumableForm>,
) -> ApiResult<Html<String>> {
    let consumable = input.validate()?;
    let updated = state.backend.update_consumable(&session.token, id, &consumable).await?;

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!(
        "{}{}{}",
        list,
        close_modal(),
        success_toast(&format!("« {} » modifié", updated.name))
    )))
}

pub async fn htmx_consumable_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    state.backend.delete_consumable(&session.token, id).await?;
    log::info!("Consumable {} deleted by {}", id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast("Consommable supprimé"))))
}
