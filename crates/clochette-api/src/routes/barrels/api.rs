//! Barrels HTMX endpoints

use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Form,
};
use clochette_core::forms::BarrelForm;
use clochette_core::Id;

use super::page::{render_barrel_fields, render_barrels_list};
use crate::error::success_toast;
use crate::widgets::{close_modal, form, modal};
use crate::{ApiError, ApiResult, AppState, Session};

async fn list_fragment(state: &AppState, session: &Session) -> ApiResult<String> {
    let mut barrels = state.backend.barrels(&session.token).await?;
    // Mounted first, then in stock, drained last
    barrels.sort_by_key(|b| (b.empty, !b.is_mounted, b.drink_name.clone()));
    Ok(render_barrels_list(state, &barrels))
}

/// HTMX: Barrels list
pub async fn htmx_barrels_list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Html<String>> {
    Ok(Html(list_fragment(&state, &session).await?))
}

pub async fn htmx_barrel_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<BarrelForm>,
) -> ApiResult<Html<String>> {
    let barrel = input.validate()?;
    let created = state.backend.create_barrel(&session.token, &barrel).await?;
    log::info!("Barrel {} created by {}", created.id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&format!("Fût de {} ajouté", created.drink_name)))))
}

pub async fn htmx_barrel_edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    let barrels = state.backend.barrels(&session.token).await?;
    let barrel = barrels.iter().find(|b| b.id == id).ok_or_else(|| ApiError::NotFound {
        resource: format!("fût {}", id),
    })?;
    let drinks = state.backend.drinks(&session.token).await?;

    let fields = render_barrel_fields(
        &drinks,
        Some(barrel.drink_id),
        &barrel.volume.normalize().to_string(),
        &barrel.buy_price.to_string(),
        &barrel.sell_price.to_string(),
    );
    let body = form(&format!("/barrels/{}", id), "#barrels-list", &fields, "Enregistrer");
    Ok(Html(modal(&format!("Modifier le fût {}", barrel.drink_name), &body)))
}

pub async fn htmx_barrel_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
    Form(input): Form<BarrelForm>,
) -> ApiResult<Html<String>> {
    let barrel = input.validate()?;
    state.backend.update_barrel(&session.token, id, &barrel).await?;

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}{}", list, close_modal(), success_toast("Fût modifié"))))
}

pub async fn htmx_barrel_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    state.backend.delete_barrel(&session.token, id).await?;
    log::info!("Barrel {} deleted by {}", id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast("Fût supprimé"))))
}

async fn set_mounted(state: AppState, session: Session, id: Id, mounted: bool) -> ApiResult<Html<String>> {
    let barrel = state.backend.set_barrel_mounted(&session.token, id, mounted).await?;
    log::info!(
        "Barrel {} {} by {}",
        id,
        if mounted { "mounted" } else { "unmounted" },
        session.account.username
    );
    let message = if mounted {
        format!("Fût de {} monté", barrel.drink_name)
    } else {
        format!("Fût de {} démonté", barrel.drink_name)
    };

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&message))))
}

pub async fn htmx_barrel_mount(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    set_mounted(state, session, id, true).await
}

pub async fn htmx_barrel_unmount(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    set_mounted(state, session, id, false).await
}
