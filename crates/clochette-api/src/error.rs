//! Error types for clochette-api
//!
//! Handlers return `ApiResult`. The response built by `ApiError` carries an
//! `ErrorReport` extension; `error_layer` then shapes it for the caller:
//! a toast for HTMX requests, a full error page otherwise, and a trip back
//! to `/login` when the backend rejected the session.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use clochette_core::forms::FormErrors;
use clochette_core::{CoreError, ErrorSeverity};
use clochette_utils::escape_html;
use thiserror::Error;

use crate::session::{clear_cookie, is_htmx_request, login_redirect};
use crate::AppState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    Form(FormErrors),

    #[error("Introuvable : {resource}")]
    NotFound { resource: String },

    #[error("{message}")]
    BadRequest { message: String },
}

impl From<FormErrors> for ApiError {
    fn from(errors: FormErrors) -> Self {
        ApiError::Form(errors)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Core(CoreError::Forbidden { .. }) => "Accès refusé",
            ApiError::Core(CoreError::Transport { .. }) => "Serveur injoignable",
            ApiError::Core(_) => "Erreur",
            ApiError::Form(_) => "Formulaire invalide",
            ApiError::NotFound { .. } => "Introuvable",
            ApiError::BadRequest { .. } => "Requête invalide",
        }
    }

    /// Lines shown in the toast body
    fn lines(&self) -> Vec<String> {
        match self {
            ApiError::Form(errors) => errors.errors().iter().map(|e| e.message.clone()).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// Marker left on error responses for `error_layer`
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub title: String,
    pub lines: Vec<String>,
    pub unauthorized: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Core(e) if e.severity() >= ErrorSeverity::Error => log::error!("{}", e.to_details()),
            _ => log::warn!("{}: {}", status, self),
        }

        let report = ErrorReport {
            title: self.title().to_string(),
            lines: self.lines(),
            unauthorized: matches!(self, ApiError::Core(CoreError::Unauthorized)),
        };

        let mut response = (status, Html(render_toast("error", &report.title, &report.lines))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

/// Toast fragment inserted into `#toasts`
pub fn render_toast(kind: &str, title: &str, lines: &[String]) -> String {
    let (border, text) = match kind {
        "success" => ("border-green-300 bg-green-50", "text-green-800"),
        _ => ("border-red-300 bg-red-50", "text-red-800"),
    };
    let body: String = lines
        .iter()
        .map(|l| format!("<li>{}</li>", escape_html(l)))
        .collect();

    format!(
        r#"<div class='toast relative border {} {} rounded-lg shadow p-3 w-80' role='alert'>
            <p class='font-semibold'>{}</p>
            <ul class='text-sm list-disc list-inside'>{}</ul>
            <button onclick='this.parentElement.remove()' class='absolute top-1 right-2 text-gray-400'>×</button>
        </div>"#,
        border,
        text,
        escape_html(title),
        body
    )
}

/// Out-of-band success toast appended to a normal HTMX answer
pub fn success_toast(message: &str) -> String {
    format!(
        "<div id='toasts' hx-swap-oob='afterbegin'>{}</div>",
        render_toast("success", "OK", &[message.to_string()])
    )
}

/// Turns `ErrorReport` responses into toasts, error pages or login redirects
pub async fn error_layer(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let htmx = is_htmx_request(req.headers());
    let response = next.run(req).await;

    let Some(report) = response.extensions().get::<ErrorReport>().cloned() else {
        return response;
    };

    if report.unauthorized {
        let mut redirect = login_redirect(htmx, None);
        if let Ok(cookie) = HeaderValue::from_str(&clear_cookie(&state.config.session)) {
            redirect.headers_mut().append(header::SET_COOKIE, cookie);
        }
        return redirect;
    }

    if htmx {
        // htmx only swaps 2xx answers
        let (mut parts, body) = response.into_parts();
        parts.status = StatusCode::OK;
        parts.headers.insert("hx-retarget", HeaderValue::from_static("#toasts"));
        parts.headers.insert("hx-reswap", HeaderValue::from_static("afterbegin"));
        return Response::from_parts(parts, body);
    }

    let status = response.status();
    let lines: String = report
        .lines
        .iter()
        .map(|l| format!("<p class='text-gray-700'>{}</p>", escape_html(l)))
        .collect();
    let content = format!(
        r#"<div class='max-w-lg mx-auto mt-24 bg-white rounded-xl shadow-sm p-8 text-center'>
            <p class='text-5xl font-bold text-gray-300 mb-4'>{}</p>
            <h2 class='text-xl font-bold mb-2'>{}</h2>
            {}
            <a href='/' class='inline-block mt-6 px-4 py-2 bg-indigo-600 text-white rounded-lg hover:bg-indigo-700'>Retour à l'accueil</a>
        </div>"#,
        status.as_u16(),
        escape_html(&report.title),
        lines
    );
    (status, Html(crate::base_html(&report.title, &content))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_errors_render_every_field() {
        let mut errors = FormErrors::default();
        errors.push("name", "Le nom est obligatoire");
        errors.push("price", "Le prix doit être un nombre");
        let error = ApiError::from(errors);
        assert_eq!(error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.lines().len(), 2);
    }

    #[test]
    fn test_backend_status_is_forwarded() {
        let error = ApiError::from(CoreError::Api {
            status: 409,
            message: "Déjà pris".to_string(),
        });
        assert_eq!(error.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::from(CoreError::Transport { message: "x".to_string() }).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_toast_escapes_messages() {
        let html = render_toast("error", "Erreur", &["<script>".to_string()]);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_response_carries_report() {
        let response = ApiError::from(CoreError::Unauthorized).into_response();
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert!(report.unauthorized);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
