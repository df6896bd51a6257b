//! Authentication endpoints

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Extension, Form, Json,
};
use clochette_core::forms::LoginForm;
use clochette_core::{Account, CoreError};
use serde::{Deserialize, Serialize};

use super::page::render_login;
use crate::session::{clear_cookie, is_htmx_request, redirect_to, safe_next, session_cookie};
use crate::{AppState, Session};

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Exchange credentials for a backend token stored in the session cookie
pub async fn htmx_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    let next = query.next.as_deref();
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(render_login(next, &form.username, Some(&errors.to_string())))).into_response();
        }
    };

    match state.backend.login(&credentials).await {
        Ok(token) => {
            log::info!("{} logged in", credentials.username);
            let response = redirect_to(is_htmx_request(&headers), &safe_next(next));
            with_cookie(response, &session_cookie(&state.config.session, &token.access_token))
        }
        Err(CoreError::Unauthorized) => {
            log::info!("Rejected login for {}", credentials.username);
            let message = "Identifiant ou mot de passe incorrect";
            (StatusCode::UNAUTHORIZED, Html(render_login(next, &form.username, Some(message)))).into_response()
        }
        Err(e) => {
            log::error!("Login failed: {}", e);
            let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Html(render_login(next, &form.username, Some(&e.to_string())))).into_response()
        }
    }
}

/// Drop the session cookie and its carts
pub async fn htmx_logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    headers: HeaderMap,
) -> Response {
    state.carts.write().await.remove(&session.key());
    log::info!("{} logged out", session.account.username);
    let response = redirect_to(is_htmx_request(&headers), "/login");
    with_cookie(response, &clear_cookie(&state.config.session))
}

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub account: Account,
    pub can_manage: bool,
}

/// Current account (JSON API)
pub async fn api_session(Extension(session): Extension<Session>) -> Json<SessionInfo> {
    Json(SessionInfo {
        can_manage: session.account.role.can_manage(),
        account: session.account,
    })
}
