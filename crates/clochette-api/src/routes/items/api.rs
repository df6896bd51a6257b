//! Non-inventoried items HTMX endpoints

use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Form,
};
use clochette_core::forms::NonInventoriedItemForm;
use clochette_core::Id;

use super::page::{render_item_fields, render_items_list};
use crate::error::success_toast;
use crate::widgets::{close_modal, form, modal};
use crate::{ApiError, ApiResult, AppState, Session};

async fn list_fragment(state: &AppState, session: &Session) -> ApiResult<String> {
    let mut items = state.backend.non_inventoried_items(&session.token).await?;
    items.sort_by(|a, b| (a.trade.to_string(), &a.name).cmp(&(b.trade.to_string(), &b.name)));
    Ok(render_items_list(state, &items))
}

/// HTMX: Items list
pub async fn htmx_items_list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Html<String>> {
    Ok(Html(list_fragment(&state, &session).await?))
}

pub async fn htmx_item_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<NonInventoriedItemForm>,
) -> ApiResult<Html<String>> {
    let item = input.validate()?;
    let created = state.backend.create_non_inventoried_item(&session.token, &item).await?;
    log::info!("Item {} created by {}", created.id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&format!("« {} » ajouté", created.name)))))
}

pub async fn htmx_item_edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    let items = state.backend.non_inventoried_items(&session.token).await?;
    let item = items.iter().find(|i| i.id == id).ok_or_else(|| ApiError::NotFound {
        resource: format!("article {}", id),
    })?;

    let fields = render_item_fields(&item.name, item.trade, &item.price.to_string());
    let body = form(&format!("/items/{}", id), "#items-list", &fields, "Enregistrer");
    Ok(Html(modal(&format!("Modifier {}", item.name), &body)))
}

pub async fn htmx_item_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
    Form(input): Form<NonInventoriedItemForm>,
) -> ApiResult<Html<String>> {
    let item = input.validate()?;
    let updated = state.backend.update_non_inventoried_item(&session.token, id, &item).await?;

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!(
        "{}{}{}",
        list,
        close_modal(),
        success_toast(&format!("« {} » modifié", updated.name))
    )))
}

pub async fn htmx_item_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    state.backend.delete_non_inventoried_item(&session.token, id).await?;
    log::info!("Item {} deleted by {}", id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast("Article supprimé"))))
}
