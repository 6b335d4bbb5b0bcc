use crate::{
    AppState,
    handlers::{admin, orders, portfolio, services, settings},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session. Every write here is either the customer
/// order form or an auth flow; content writes live in the authenticated router on
/// the same paths.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // --- Catalog & gallery (read) ---
        .route("/api/services", get(services::list_services))
        .route("/api/services/{id}", get(services::get_service))
        .route("/api/portfolio", get(portfolio::list_portfolio))
        // POST /api/orders
        // The customer order form. New orders start as `pending`.
        .route("/api/orders", post(orders::create_order))
        // --- Singleton content documents (read, seeded on first access) ---
        .route("/api/settings", get(settings::get_site_settings))
        .route("/api/footer-settings", get(settings::get_footer_settings))
        .route("/api/navbar-settings", get(settings::get_navbar_settings))
        .route("/api/about", get(settings::get_about))
        .route("/api/contact-info", get(settings::get_contact_info))
        .route(
            "/api/services-page-settings",
            get(settings::get_services_page_settings),
        )
        // --- Auth ---
        .route("/api/auth/login", post(admin::login))
        .route("/api/auth/logout", post(admin::logout))
        // POST /api/admin/register
        // Open while no admin exists; the handler demands a session afterwards.
        .route("/api/admin/register", post(admin::register_admin))
}
