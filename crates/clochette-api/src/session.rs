//! Session cookie, authentication middleware and per-session carts
//!
//! The backend JWT lives in an HttpOnly cookie. Every protected request
//! resolves it to the current account before reaching a handler.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use clochette_config::SessionConfig;
use clochette_core::{Account, Cart, Catalog, CoreError, TransactionKind};
use clochette_utils::short_hash;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::{ApiError, AppState};

/// Authenticated caller, inserted as a request extension
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: Account,
}

impl Session {
    /// Key of this session in the cart store
    pub fn key(&self) -> String {
        short_hash(&self.token)
    }
}

/// Cart and the catalog it was opened against
#[derive(Debug, Clone)]
pub struct PointOfSale {
    pub cart: Cart,
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Default)]
pub struct SessionCarts {
    pub sale: Option<PointOfSale>,
    pub purchase: Option<PointOfSale>,
    /// Last time a cart of this session was opened or changed
    pub touched: Option<Instant>,
}

impl SessionCarts {
    pub fn touch(&mut self, now: Instant) {
        self.touched = Some(now);
    }

    fn idle_for(&self, now: Instant) -> Duration {
        self.touched.map_or(Duration::MAX, |t| now.saturating_duration_since(t))
    }

    pub fn get(&self, kind: TransactionKind) -> Option<&PointOfSale> {
        match kind {
            TransactionKind::Sale => self.sale.as_ref(),
            TransactionKind::Purchase => self.purchase.as_ref(),
        }
    }

    pub fn slot(&mut self, kind: TransactionKind) -> &mut Option<PointOfSale> {
        match kind {
            TransactionKind::Sale => &mut self.sale,
            TransactionKind::Purchase => &mut self.purchase,
        }
    }
}

/// Carts of every open session, keyed by `Session::key`
pub type CartStore = Arc<RwLock<HashMap<String, SessionCarts>>>;

/// Drop the carts of sessions idle for longer than `max_idle`; returns how many
pub fn prune_idle(carts: &mut HashMap<String, SessionCarts>, now: Instant, max_idle: Duration) -> usize {
    let before = carts.len();
    carts.retain(|_, c| c.idle_for(now) <= max_idle);
    before - carts.len()
}

/// Check if request is from HTMX (partial page update)
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Read the session token from the `Cookie` header
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn cookie_attributes(config: &SessionConfig, max_age: u64) -> String {
    let secure = if config.secure { "; Secure" } else { "" };
    format!("Path=/; HttpOnly; SameSite=Lax; Max-Age={}{}", max_age, secure)
}

/// `Set-Cookie` value storing `token`
pub fn session_cookie(config: &SessionConfig, token: &str) -> String {
    format!("{}={}; {}", config.cookie_name, token, cookie_attributes(config, config.max_age_secs))
}

/// `Set-Cookie` value removing the session
pub fn clear_cookie(config: &SessionConfig) -> String {
    format!("{}=; {}", config.cookie_name, cookie_attributes(config, 0))
}

/// Redirect target after login; only local paths are honoured
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/login") => path.to_string(),
        _ => "/".to_string(),
    }
}

/// Send the browser to `location`: `HX-Redirect` for htmx, 303 otherwise
pub fn redirect_to(htmx: bool, location: &str) -> Response {
    let Ok(value) = HeaderValue::from_str(location) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if htmx {
        (StatusCode::OK, [("hx-redirect", value)]).into_response()
    } else {
        (StatusCode::SEE_OTHER, [(header::LOCATION, value)]).into_response()
    }
}

/// Redirect to the login page, remembering where the user was going
pub fn login_redirect(htmx: bool, next: Option<&str>) -> Response {
    let location = match next {
        Some(path) if path != "/" => format!("/login?next={}", urlencoding::encode(path)),
        _ => "/login".to_string(),
    };
    redirect_to(htmx, &location)
}

/// Resolve the session cookie to an account or redirect to `/login`
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let htmx = is_htmx_request(req.headers());
    let wanted = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    // Only page loads are worth coming back to.
    let next_path = (!htmx && req.method() == axum::http::Method::GET).then_some(wanted.as_str());

    let Some(token) = session_token(req.headers(), &state.config.session.cookie_name) else {
        return login_redirect(htmx, next_path);
    };

    match state.backend.current_account(&token).await {
        Ok(account) => {
            req.extensions_mut().insert(Session { token, account });
            next.run(req).await
        }
        Err(CoreError::Unauthorized) => {
            log::info!("Session {} rejected by backend", short_hash(&token));
            state.carts.write().await.remove(&short_hash(&token));
            let mut response = login_redirect(htmx, next_path);
            if let Ok(cookie) = HeaderValue::from_str(&clear_cookie(&state.config.session)) {
                response.headers_mut().append(header::SET_COOKIE, cookie);
            }
            response
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secure: bool) -> SessionConfig {
        SessionConfig {
            cookie_name: "clochette_session".to_string(),
            secure,
            max_age_secs: 3600,
        }
    }

    #[test]
    fn test_session_token_among_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; clochette_session=abc.def; lang=fr"));
        assert_eq!(session_token(&headers, "clochette_session"), Some("abc.def".to_string()));
        assert_eq!(session_token(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_is_no_session() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("clochette_session="));
        assert_eq!(session_token(&headers, "clochette_session"), None);
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = session_cookie(&config(false), "jwt");
        assert!(cookie.starts_with("clochette_session=jwt;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
        assert!(session_cookie(&config(true), "jwt").ends_with("; Secure"));
        assert!(clear_cookie(&config(false)).contains("Max-Age=0"));
    }

    #[test]
    fn test_prune_idle_keeps_recent_sessions() {
        let start = Instant::now();
        let mut carts = HashMap::new();
        let mut old = SessionCarts::default();
        old.touch(start);
        carts.insert("old".to_string(), old);
        carts.insert("never".to_string(), SessionCarts::default());
        let mut recent = SessionCarts::default();
        recent.touch(start + Duration::from_secs(3000));
        carts.insert("recent".to_string(), recent);

        let now = start + Duration::from_secs(3601);
        assert_eq!(prune_idle(&mut carts, now, Duration::from_secs(3600)), 2);
        assert_eq!(carts.len(), 1);
        assert!(carts.contains_key("recent"));
    }

    #[test]
    fn test_safe_next_rejects_foreign_targets() {
        assert_eq!(safe_next(Some("/sale")), "/sale");
        assert_eq!(safe_next(Some("//evil.example")), "/");
        assert_eq!(safe_next(Some("https://evil.example")), "/");
        assert_eq!(safe_next(Some("/login")), "/");
        assert_eq!(safe_next(None), "/");
    }

    #[test]
    fn test_login_redirect_flavours() {
        let page = login_redirect(false, Some("/treasury?range=year"));
        assert_eq!(page.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            page.headers().get(header::LOCATION).unwrap(),
            "/login?next=%2Ftreasury%3Frange%3Dyear"
        );

        let fragment = login_redirect(true, None);
        assert_eq!(fragment.status(), StatusCode::OK);
        assert_eq!(fragment.headers().get("hx-redirect").unwrap(), "/login");
    }
}
