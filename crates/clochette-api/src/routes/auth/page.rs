//! Login page rendering

use axum::{extract::Query, response::Html};
use clochette_utils::escape_html;

use super::api::NextQuery;

pub async fn page_login(Query(query): Query<NextQuery>) -> Html<String> {
    Html(render_login(query.next.as_deref(), "", None))
}

/// Login form, optionally with an error and the previous username
pub fn render_login(next: Option<&str>, username: &str, error: Option<&str>) -> String {
    let action = match next {
        Some(next) => format!("/login?next={}", urlencoding::encode(next)),
        None => "/login".to_string(),
    };
    let error = error
        .map(|e| format!("<div class='mb-4 p-3 rounded-lg border border-red-300 bg-red-50 text-red-800 text-sm'>{}</div>", escape_html(e)))
        .unwrap_or_default();

    let content = format!(
        r#"<div class='min-h-screen flex items-center justify-center'>
            <div class='bg-white rounded-xl shadow-sm p-8 w-full max-w-sm'>
                <h1 class='text-2xl font-bold text-indigo-600 mb-6 text-center'>Clochette</h1>
                {}
                <form method='post' action='{}' class='space-y-4'>
                    {}
                    {}
                    <button type='submit' class='w-full px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Se connecter</button>
                </form>
            </div>
        </div>"#,
        error,
        escape_html(&action),
        crate::widgets::input("username", "Identifiant", username, "text"),
        crate::widgets::input("password", "Mot de passe", "", "password"),
    );
    crate::base_html("Connexion", &content)
}
