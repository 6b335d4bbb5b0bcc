use crate::{
    AppState,
    handlers::{admin, orders, portfolio, services, settings},
};
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// Authenticated Router Module
///
/// Every mutating content endpoint plus the private reads (orders, admins, stats).
/// `create_router` wraps this router in `require_session`, so handlers here only
/// run for a verified, unexpired session whose admin still exists.
///
/// Paths shared with the public router differ by method only; Axum merges them.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // --- Services ---
        .route("/api/services", post(services::create_service))
        .route(
            "/api/services/{id}",
            put(services::update_service).delete(services::delete_service),
        )
        // --- Orders ---
        .route("/api/orders", get(orders::list_orders))
        .route(
            "/api/orders/{id}",
            get(orders::get_order)
                .patch(orders::update_order)
                .delete(orders::delete_order),
        )
        // --- Portfolio ---
        .route("/api/portfolio", post(portfolio::create_portfolio_image))
        .route(
            "/api/portfolio/{id}",
            patch(portfolio::update_portfolio_image).delete(portfolio::delete_portfolio_image),
        )
        // --- Singleton content documents (merge update) ---
        .route("/api/settings", patch(settings::update_site_settings))
        .route("/api/footer-settings", patch(settings::update_footer_settings))
        .route("/api/navbar-settings", patch(settings::update_navbar_settings))
        .route("/api/about", patch(settings::update_about))
        .route("/api/contact-info", patch(settings::update_contact_info))
        .route(
            "/api/services-page-settings",
            patch(settings::update_services_page_settings),
        )
        // --- Session & admin dashboard ---
        .route("/api/auth/session", get(admin::get_session))
        .route("/api/admins", get(admin::list_admins))
        .route("/api/admin/stats", get(admin::get_admin_stats))
}
