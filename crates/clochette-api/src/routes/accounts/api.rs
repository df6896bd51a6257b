//! Accounts HTMX endpoints

use axum::{
    extract::{Path, State},
    response::Html,
    Extension, Form,
};
use clochette_core::forms::AccountForm;
use clochette_core::{CoreError, Id};

use super::page::{render_account_fields, render_accounts_list};
use crate::error::success_toast;
use crate::widgets::{close_modal, form, modal};
use crate::{ApiError, ApiResult, AppState, Session};

/// Account management is reserved to treasurer and above
pub(crate) fn require_manager(session: &Session) -> ApiResult<()> {
    if session.account.role.can_manage() {
        Ok(())
    } else {
        log::warn!("{} denied access to account management", session.account.username);
        Err(CoreError::Forbidden {
            message: "La gestion des comptes est réservée aux gestionnaires".to_string(),
        }
        .into())
    }
}

async fn list_fragment(state: &AppState, session: &Session) -> ApiResult<String> {
    let mut accounts = state.backend.accounts(&session.token).await?;
    accounts.sort_by(|a, b| b.role.cmp(&a.role).then_with(|| a.username.cmp(&b.username)));
    Ok(render_accounts_list(&accounts, session.account.id))
}

/// HTMX: Accounts list
pub async fn htmx_accounts_list(State(state): State<AppState>, Extension(session): Extension<Session>) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    Ok(Html(list_fragment(&state, &session).await?))
}

pub async fn htmx_account_create(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Form(input): Form<AccountForm>,
) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    let account = input.validate(true)?;
    let created = state.backend.create_account(&session.token, &account).await?;
    log::info!("Account {} ({}) created by {}", created.username, created.role, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast(&format!("Compte « {} » créé", created.username)))))
}

pub async fn htmx_account_edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    let accounts = state.backend.accounts(&session.token).await?;
    let account = accounts.iter().find(|a| a.id == id).ok_or_else(|| ApiError::NotFound {
        resource: format!("compte {}", id),
    })?;

    let fields = render_account_fields(Some(account));
    let body = form(&format!("/accounts/{}", id), "#accounts-list", &fields, "Enregistrer");
    Ok(Html(modal(&format!("Modifier {}", account.username), &body)))
}

pub async fn htmx_account_update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
    Form(input): Form<AccountForm>,
) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    let account = input.validate(false)?;
    let updated = state.backend.update_account(&session.token, id, &account).await?;
    log::info!("Account {} updated by {}", updated.username, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!(
        "{}{}{}",
        list,
        close_modal(),
        success_toast(&format!("Compte « {} » modifié", updated.username))
    )))
}

pub async fn htmx_account_delete(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<Id>,
) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    if id == session.account.id {
        return Err(ApiError::BadRequest {
            message: "Vous ne pouvez pas supprimer votre propre compte".to_string(),
        });
    }
    state.backend.delete_account(&session.token, id).await?;
    log::info!("Account {} deleted by {}", id, session.account.username);

    let list = list_fragment(&state, &session).await?;
    Ok(Html(format!("{}{}", list, success_toast("Compte supprimé"))))
}
