//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::auth: Login, logout, session info
//! - routes::dashboard: Treasury figures, stock alerts, recent sales
//! - routes::drinks / barrels / consumables / items: Inventory management
//! - routes::pos: Sale and purchase points of sale with carts
//! - routes::transactions: Transaction history, pagination, detail
//! - routes::treasury: Balances and period summary
//! - routes::accounts: Staff accounts (managers only)
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;
pub mod session;
pub mod widgets;

use axum::{
    http::{header, HeaderMap, HeaderValue},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use clochette_config::Config;
use clochette_core::{Account, BackendRef};
use clochette_utils::escape_html;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub use error::{ApiError, ApiResult};
pub use session::Session;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendRef,
    pub config: Config,
    pub carts: session::CartStore,
}

impl AppState {
    pub fn new(config: Config, backend: BackendRef) -> Self {
        Self {
            backend,
            config,
            carts: Arc::new(RwLock::new(Default::default())),
        }
    }

    /// Format an amount with the configured currency
    pub fn money(&self, amount: Decimal) -> String {
        clochette_core::pricing::format_amount(amount, &self.config.currency)
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{htmx_account_create, htmx_account_delete, htmx_account_edit_form, htmx_account_update, htmx_accounts_list, page_accounts};
    use routes::auth::{api_session, htmx_login, htmx_logout, page_login};
    use routes::barrels::{htmx_barrel_create, htmx_barrel_delete, htmx_barrel_edit_form, htmx_barrel_mount, htmx_barrel_unmount, htmx_barrel_update, htmx_barrels_list, page_barrels};
    use routes::consumables::{htmx_consumable_create, htmx_consumable_delete, htmx_consumable_edit_form, htmx_consumable_update, htmx_consumables_list, page_consumables};
    use routes::dashboard::page_dashboard;
    use routes::drinks::{htmx_drink_create, htmx_drink_delete, htmx_drink_edit_form, htmx_drink_update, htmx_drinks_list, page_drinks};
    use routes::items::{htmx_item_create, htmx_item_delete, htmx_item_edit_form, htmx_item_update, htmx_items_list, page_items};
    use routes::pos::{api_purchase_cart, api_sale_cart, htmx_purchase_cart, htmx_purchase_checkout, htmx_sale_cart, htmx_sale_checkout, page_purchase, page_sale};
    use routes::settings::{api_settings, page_settings};
    use routes::transactions::{htmx_transaction_detail, htmx_transactions_list, page_transactions};
    use routes::treasury::{api_treasury, page_treasury};

    let protected = Router::new()
        // API endpoints
        .route("/api/session", get(api_session))
        .route("/api/cart/sale", get(api_sale_cart))
        .route("/api/cart/purchase", get(api_purchase_cart))
        .route("/api/treasury", get(api_treasury))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_dashboard))
        .route("/sale", get(page_sale))
        .route("/purchase", get(page_purchase))
        .route("/drinks", get(page_drinks).post(htmx_drink_create))
        .route("/barrels", get(page_barrels).post(htmx_barrel_create))
        .route("/consumables", get(page_consumables).post(htmx_consumable_create))
        .route("/items", get(page_items).post(htmx_item_create))
        .route("/transactions", get(page_transactions))
        .route("/treasury", get(page_treasury))
        .route("/accounts", get(page_accounts).post(htmx_account_create))
        .route("/settings", get(page_settings))
        .route("/logout", post(htmx_logout))
        // HTMX partial routes
        .route("/sale/cart/:action", post(htmx_sale_cart))
        .route("/sale/checkout", post(htmx_sale_checkout))
        .route("/purchase/cart/:action", post(htmx_purchase_cart))
        .route("/purchase/checkout", post(htmx_purchase_checkout))
        .route("/drinks/list", get(htmx_drinks_list))
        .route("/drinks/:id/edit", get(htmx_drink_edit_form))
        .route("/drinks/:id", post(htmx_drink_update).delete(htmx_drink_delete))
        .route("/barrels/list", get(htmx_barrels_list))
        .route("/barrels/:id/edit", get(htmx_barrel_edit_form))
        .route("/barrels/:id", post(htmx_barrel_update).delete(htmx_barrel_delete))
        .route("/barrels/:id/mount", post(htmx_barrel_mount))
        .route("/barrels/:id/unmount", post(htmx_barrel_unmount))
        .route("/consumables/list", get(htmx_consumables_list))
        .route("/consumables/:id/edit", get(htmx_consumable_edit_form))
        .route("/consumables/:id", post(htmx_consumable_update).delete(htmx_consumable_delete))
        .route("/items/list", get(htmx_items_list))
        .route("/items/:id/edit", get(htmx_item_edit_form))
        .route("/items/:id", post(htmx_item_update).delete(htmx_item_delete))
        .route("/transactions/list", get(htmx_transactions_list))
        .route("/transactions/:id/detail", get(htmx_transaction_detail))
        .route("/accounts/list", get(htmx_accounts_list))
        .route("/accounts/:id/edit", get(htmx_account_edit_form))
        .route("/accounts/:id", post(htmx_account_update).delete(htmx_account_delete))
        .route_layer(from_fn_with_state(state.clone(), session::require_session));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/login", get(page_login).post(htmx_login))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(state.clone(), error::error_layer))
                // Pages embed per-session carts.
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Clochette</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <div id="toasts" class="fixed top-4 right-4 z-50 space-y-2"></div>
    <div id="modal"></div>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Navigation sidebar
pub fn nav_sidebar(current_path: &str, account: &Account) -> String {
    let mut links = vec![
        ("/", "Tableau de bord", "🏠"),
        ("/sale", "Vente", "🍺"),
        ("/purchase", "Achat", "🛒"),
        ("/drinks", "Boissons", "🍹"),
        ("/barrels", "Fûts", "🛢️"),
        ("/consumables", "Consommables", "🥨"),
        ("/items", "Hors stock", "♻️"),
        ("/transactions", "Transactions", "📋"),
        ("/treasury", "Trésorerie", "💶"),
    ];
    if account.role.can_manage() {
        links.push(("/accounts", "Comptes", "👥"));
    }
    links.push(("/settings", "Paramètres", "⚙️"));

    let mut nav = String::from("<div class='bg-white border-r h-screen flex flex-col'><div class='p-4 border-b'><h1 class='text-xl font-bold text-indigo-600'>Clochette</h1></div><ul class='flex-1 py-2 space-y-1 px-2'>");

    for (path, label, icon) in &links {
        let is_active = if *path == "/" {
            current_path == "/"
        } else {
            current_path.starts_with(path)
        };
        let active_class = if is_active { "bg-indigo-50 text-indigo-600" } else { "text-gray-600 hover:bg-gray-50" };
        nav.push_str(&format!(
            r#"<li><a href='{}' class='flex items-center gap-2 px-3 py-2 rounded-lg {}'>{}<span>{}</span></a></li>"#,
            path, active_class, icon, label
        ));
    }
    nav.push_str(&format!(
        r#"</ul><div class='p-4 border-t text-sm'>
            <p class='font-medium'>{}</p>
            <p class='text-gray-500 mb-2'>{}</p>
            <form method='post' action='/logout'><button class='text-red-600 hover:underline'>Se déconnecter</button></form>
        </div></div>"#,
        escape_html(&account.display_name()),
        account.role.label()
    ));
    nav
}

/// Wrap content for full page or HTMX partial
pub fn page_response(headers: &HeaderMap, title: &str, current_path: &str, session: &Session, inner_content: &str) -> String {
    if session::is_htmx_request(headers) {
        // HTMX partial - just the content area (no sidebar for partial updates)
        format!(r#"<main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>"#, inner_content)
    } else {
        base_html(title, &format!(r#"<div class='flex flex-col h-screen'>
    <div class='flex flex-1 overflow-hidden'>
        <aside class='w-64 flex-shrink-0'>{}</aside>
        <main class='flex-1 overflow-auto bg-gray-50 p-6'>{}</main>
    </div>
</div>"#,
            nav_sidebar(current_path, &session.account), inner_content))
    }
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config, backend: BackendRef) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Backend API at {}", config.backend.base_url);
    let state = AppState::new(config, backend);

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Clochette on http://{}", addr);
    log::info!("  - / (Dashboard)");
    log::info!("  - /sale, /purchase (Points of sale)");
    log::info!("  - /drinks, /barrels, /consumables, /items (Inventory)");
    log::info!("  - /transactions, /treasury (History and balances)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use clochette_client::MemoryBackend;
    use clochette_core::{BackendApi, PaymentMethod};
    use tower::ServiceExt;

    fn app() -> (Router, Arc<MemoryBackend>) {
        let memory = Arc::new(MemoryBackend::seeded());
        let backend: BackendRef = memory.clone();
        (create_router(AppState::new(Config::default(), backend)), memory)
    }

    fn cookie(username: &str) -> String {
        format!("clochette_session={}", MemoryBackend::token_for(username))
    }

    fn get(path: &str, username: Option<&str>, htmx: bool) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(username) = username {
            builder = builder.header(header::COOKIE, cookie(username));
        }
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post(path: &str, username: Option<&str>, form: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        if let Some(username) = username {
            builder = builder.header(header::COOKIE, cookie(username));
        }
        builder.body(Body::from(form.to_string())).unwrap()
    }

    async fn text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header_value<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (app, _) = app();
        let response = app.oneshot(get("/api/health", None, false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_anonymous_page_redirects_to_login() {
        let (app, _) = app();
        let response = app.clone().oneshot(get("/sale", None, false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_value(&response, "location"), Some("/login?next=%2Fsale"));

        let response = app.oneshot(get("/drinks/list", None, true)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, "hx-redirect"), Some("/login"));
    }

    #[tokio::test]
    async fn test_unknown_token_clears_cookie() {
        let (app, _) = app();
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "clochette_session=forged")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(header_value(&response, "set-cookie").is_some_and(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_follows_next() {
        let (app, _) = app();
        let mut request = post("/login?next=%2Ftreasury", None, "username=barman&password=clochette");
        request.headers_mut().remove("hx-request");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_value(&response, "location"), Some("/treasury"));
        let set_cookie = header_value(&response, "set-cookie").unwrap();
        assert!(set_cookie.starts_with(&cookie("barman")));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let (app, _) = app();
        let response = app
            .oneshot(post("/login", None, "username=barman&password=wrong-password"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(header_value(&response, "set-cookie").is_none());
        assert!(text(response).await.contains("Identifiant ou mot de passe incorrect"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (app, _) = app();
        let response = app.oneshot(post("/logout", Some("barman"), "")).await.unwrap();
        assert_eq!(header_value(&response, "hx-redirect"), Some("/login"));
        assert!(header_value(&response, "set-cookie").is_some_and(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn test_dashboard_shows_alerts() {
        let (app, _) = app();
        let response = app.oneshot(get("/", Some("barman"), false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, "cache-control"), Some("no-store"));
        let body = text(response).await;
        assert!(body.contains("Bonjour Sacha Petit"));
        assert!(body.contains("Coca"));
        assert!(!body.contains("/accounts"));
    }

    #[tokio::test]
    async fn test_htmx_page_is_a_fragment() {
        let (app, _) = app();
        let response = app.oneshot(get("/drinks", Some("barman"), true)).await.unwrap();
        let body = text(response).await;
        assert!(body.starts_with("<main"));
        assert!(!body.contains("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_invalid_form_renders_toast() {
        let (app, _) = app();
        let response = app
            .oneshot(post("/drinks", Some("barman"), "name=&description="))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, "hx-retarget"), Some("#toasts"));
        assert_eq!(header_value(&response, "hx-reswap"), Some("afterbegin"));
        assert!(text(response).await.contains("Formulaire invalide"));
    }

    #[tokio::test]
    async fn test_create_drink_refreshes_list() {
        let (app, _) = app();
        let response = app
            .oneshot(post("/drinks", Some("barman"), "name=Ambr%C3%A9e&description=Bi%C3%A8re+ambr%C3%A9e"))
            .await
            .unwrap();
        assert!(header_value(&response, "hx-retarget").is_none());
        let body = text(response).await;
        assert!(body.contains("Ambrée"));
        assert!(body.contains("Blonde"));
        assert!(body.contains("hx-swap-oob"));
    }

    #[tokio::test]
    async fn test_mount_barrel() {
        let (app, memory) = app();
        let token = MemoryBackend::token_for("barman");
        let cidre = memory
            .barrels(&token)
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.drink_name == "Cidre")
            .unwrap();

        let path = format!("/barrels/{}/mount", cidre.id);
        let response = app.oneshot(post(&path, Some("barman"), "")).await.unwrap();
        assert!(text(response).await.contains("Fût de Cidre monté"));
        let barrels = memory.barrels(&token).await.unwrap();
        assert!(barrels.iter().any(|b| b.id == cidre.id && b.is_mounted));
    }

    #[tokio::test]
    async fn test_cart_without_page_asks_for_reload() {
        let (app, _) = app();
        let response = app
            .oneshot(post("/sale/cart/increment", Some("barman"), "item_type=glass&name=Blonde"))
            .await
            .unwrap();
        assert_eq!(header_value(&response, "hx-retarget"), Some("#toasts"));
        assert!(text(response).await.contains("rechargez la page"));
    }

    #[tokio::test]
    async fn test_sale_flow_with_deposit() {
        let (app, memory) = app();
        let page = app.clone().oneshot(get("/sale", Some("barman"), false)).await.unwrap();
        let body = text(page).await;
        assert!(body.contains("Blonde"));
        assert!(body.contains("EcoCup"));

        for action in ["increment", "increment", "decrement"] {
            let path = format!("/sale/cart/{}", action);
            let response = app
                .clone()
                .oneshot(post(&path, Some("barman"), "item_type=glass&name=Blonde"))
                .await
                .unwrap();
            assert!(header_value(&response, "hx-retarget").is_none());
        }

        let cart = app.clone().oneshot(get("/api/cart/sale", Some("barman"), false)).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(cart).await).unwrap();
        let lines = json["lines"].as_array().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l["quantity"] == 1));
        assert_eq!(json["formatted_total"], "3,50 €");

        let response = app
            .clone()
            .oneshot(post("/sale/checkout", Some("barman"), "payment_method=cash"))
            .await
            .unwrap();
        assert!(text(response).await.contains("Vente enregistrée : 3,50 €"));

        let token = MemoryBackend::token_for("barman");
        let treasury = memory.treasury(&token).await.unwrap();
        assert_eq!(treasury.amount_for(PaymentMethod::Cash), Decimal::new(30350, 2));

        // Checkout starts a fresh cart
        let cart = app.clone().oneshot(get("/api/cart/sale", Some("barman"), false)).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(cart).await).unwrap();
        assert!(json["lines"].as_array().unwrap().is_empty());

        let history = app.oneshot(get("/transactions/list?range=all", Some("barman"), true)).await.unwrap();
        assert!(text(history).await.contains("Blonde"));
    }

    #[tokio::test]
    async fn test_empty_checkout_is_rejected() {
        let (app, _) = app();
        app.clone().oneshot(get("/purchase", Some("tresorier"), false)).await.unwrap();
        let response = app
            .oneshot(post("/purchase/checkout", Some("tresorier"), "payment_method=card"))
            .await
            .unwrap();
        assert_eq!(header_value(&response, "hx-retarget"), Some("#toasts"));
        assert!(text(response).await.contains("Le panier est vide"));
    }

    #[tokio::test]
    async fn test_accounts_reserved_to_managers() {
        let (app, _) = app();
        let response = app.clone().oneshot(get("/accounts", Some("barman"), false)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(text(response).await.contains("Accès refusé"));

        let response = app.clone().oneshot(get("/accounts/list", Some("barman"), true)).await.unwrap();
        assert_eq!(header_value(&response, "hx-retarget"), Some("#toasts"));

        let response = app.oneshot(get("/accounts/list", Some("admin"), true)).await.unwrap();
        let body = text(response).await;
        assert!(body.contains("tresorier"));
        assert!(body.contains("barman"));
    }

    #[tokio::test]
    async fn test_treasury_api_reports_balances() {
        let (app, _) = app();
        let response = app.oneshot(get("/api/treasury?range=all", Some("tresorier"), false)).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
        assert_eq!(json["period"]["transaction_count"], 0);
        assert!(json["treasury"]["total_amount"].is_string());
    }

    #[tokio::test]
    async fn test_settings_api_exposes_config() {
        let (app, _) = app();
        let response = app.oneshot(get("/api/settings", Some("barman"), false)).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text(response).await).unwrap();
        assert_eq!(json["sale"]["deposit_item_name"], "EcoCup");
    }
}
