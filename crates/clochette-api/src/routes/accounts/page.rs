//! Accounts page rendering

use axum::{http::HeaderMap, response::Html, Extension};
use clochette_core::{Account, Id, Role};
use clochette_utils::escape_html;

use super::api::require_manager;
use crate::widgets::{checkbox, form, input, row_actions, section, select, table};
use crate::{ApiResult, Session};

pub async fn page_accounts(Extension(session): Extension<Session>, headers: HeaderMap) -> ApiResult<Html<String>> {
    require_manager(&session)?;
    let create = form("/accounts", "#accounts-list", &render_account_fields(None), "Créer");
    let inner_content = section("Comptes", "Nouveau compte", &create, "accounts-list", "/accounts/list");
    Ok(Html(crate::page_response(&headers, "Comptes", "/accounts", &session, &inner_content)))
}

/// Account form fields, prefilled when editing
pub fn render_account_fields(account: Option<&Account>) -> String {
    let roles: Vec<(String, String)> = Role::ALL.iter().map(|r| (r.to_string(), r.label().to_string())).collect();
    let role = account.map(|a| a.role).unwrap_or(Role::Staff);
    let password_label = if account.is_some() {
        "Nouveau mot de passe (laisser vide pour conserver)"
    } else {
        "Mot de passe"
    };
    format!(
        "{}{}{}{}{}{}{}",
        input("username", "Identifiant", account.map(|a| a.username.as_str()).unwrap_or(""), "text"),
        input("email", "E-mail", account.map(|a| a.email.as_str()).unwrap_or(""), "email"),
        input("first_name", "Prénom", account.map(|a| a.first_name.as_str()).unwrap_or(""), "text"),
        input("last_name", "Nom", account.map(|a| a.last_name.as_str()).unwrap_or(""), "text"),
        select("role", "Rôle", &roles, &role.to_string()),
        checkbox("active", "Actif", account.map(|a| a.active).unwrap_or(true)),
        input("password", password_label, "", "password")
    )
}

pub fn render_accounts_list(accounts: &[Account], current_id: Id) -> String {
    let rows: String = accounts
        .iter()
        .map(|a| {
            let status = if a.active {
                "<span class='px-2 py-0.5 rounded-full text-xs bg-green-100 text-green-700'>Actif</span>"
            } else {
                "<span class='px-2 py-0.5 rounded-full text-xs bg-gray-100 text-gray-600'>Inactif</span>"
            };
            let actions = if a.id == current_id {
                "<span class='text-xs text-gray-400'>vous</span>".to_string()
            } else {
                row_actions("/accounts", a.id, "#accounts-list", &format!("Supprimer le compte {} ?", a.username))
            };
            format!(
                "<tr><td class='px-4 py-2'><div class='font-medium'>{}</div><div class='text-xs text-gray-500'>{}</div></td><td class='px-4 py-2 text-sm'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2'>{}</td><td class='px-4 py-2 text-right'>{}</td></tr>",
                escape_html(&a.username),
                escape_html(&a.display_name()),
                escape_html(&a.email),
                a.role.label(),
                status,
                actions
            )
        })
        .collect();
    table(&["Compte", "E-mail", "Rôle", "Statut", ""], &rows, "Aucun compte")
}
