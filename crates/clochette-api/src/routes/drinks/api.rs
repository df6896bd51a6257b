//! Drinks HTMX endpoints
//!
//! Every mutation answers with the refreshed list fragment for
//! `#drinks-list`, plus out-of-band toast and modal swaps.

use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Form,
};
use clochette_core::forms::DrinkForm;
use clochette_core::Id;

use super::page::{render_drink_fields, render_drinks_list};
use crate::error::success_toast;
use crate::widgets::{close_modal, form, modal};
use crate::{ApiError, ApiResult, AppState, Session};

async fn list_fragment(state: &AppState, session: &Session) -> ApiResult<String> {
    let drinks = state.backend.drinks(&session.token).await?;
    Ok(render_drinks_list(&drinks))
}

/// HTMX: Drinks list
pub async fn htmx_drinks_list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Html<String>> {
    Ok(Html(list_fragment(&state, &session).await?))
}

pub async fn htmx_drink_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<DrinkForm>,
) -> ApiResult<Html<String>> {
    let drink = input.validate()?;
    let created = state.backend.create_drink(&session.token, &drink).await?;
    log::info!("Drink {} created by {}", created.id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&format!("Boisson « {} » ajoutée", created.name)))))
}

/// HTMX: Edit form in a modal
pub async fn htmx_drink_edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    let drinks = state.backend.drinks(&session.token).await?;
    let drink = drinks.iter().find(|d| d.id == id).ok_or_else(|| ApiError::NotFound {
        resource: format!("boisson {}", id),
    })?;

    let fields = render_drink_fields(&drink.name, drink.description.as_deref().unwrap_or(""));
    let body = form(&format!("/drinks/{}", id), "#drinks-list", &fields, "Enregistrer");
    Ok(Html(modal(&format!("Modifier {}", drink.name), &body)))
}

pub async fn htmx_drink_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
    Form(input): Form<DrinkForm>,
) -> ApiResult<Html<String>> {
    let drink = input.validate()?;
    let updated = state.backend.update_drink(&session.token, id, &drink).await?;

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!(
        "{}{}{}",
        list,
        close_modal(),
        success_toast(&format!("Boisson « {} » modifiée", updated.name))
    )))
}

pub async fn htmx_drink_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    state.backend.delete_drink(&session.token, id).await?;
    log::info!("Drink {} deleted by {}", id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast("Boisson supprimée"))))
}
