use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod documents;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod password;
pub mod repository;
pub mod session;

// Module for routing segregation (Public, Authenticated, Admin UI).
pub mod routes;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::ApiError;
pub use memory::InMemoryRepository;
pub use repository::{PostgresRepository, Repository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and schema into the OpenAPI document
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::services::list_services, handlers::services::get_service,
        handlers::services::create_service, handlers::services::update_service,
        handlers::services::delete_service,
        handlers::orders::list_orders, handlers::orders::create_order,
        handlers::orders::get_order, handlers::orders::update_order,
        handlers::orders::delete_order,
        handlers::portfolio::list_portfolio, handlers::portfolio::create_portfolio_image,
        handlers::portfolio::update_portfolio_image, handlers::portfolio::delete_portfolio_image,
        handlers::settings::get_site_settings, handlers::settings::update_site_settings,
        handlers::settings::get_footer_settings, handlers::settings::update_footer_settings,
        handlers::settings::get_navbar_settings, handlers::settings::update_navbar_settings,
        handlers::settings::get_about, handlers::settings::update_about,
        handlers::settings::get_contact_info, handlers::settings::update_contact_info,
        handlers::settings::get_services_page_settings,
        handlers::settings::update_services_page_settings,
        handlers::admin::login, handlers::admin::logout, handlers::admin::get_session,
        handlers::admin::register_admin, handlers::admin::list_admins,
        handlers::admin::get_admin_stats
    ),
    components(
        schemas(
            models::Service, models::CreateServiceRequest, models::UpdateServiceRequest,
            models::Order, models::OrderStatus, models::CreateOrderRequest,
            models::UpdateOrderRequest, models::PortfolioImage, models::CreatePortfolioRequest,
            models::UpdatePortfolioRequest, models::AdminProfile, models::AdminSummary,
            models::LoginRequest, models::RegisterAdminRequest, models::DashboardStats,
            documents::SiteSettings, documents::FooterSettings, documents::NavbarSettings,
            documents::About, documents::ContactInfo, documents::ServicesPageSettings,
        )
    ),
    tags(
        (name = "modelpro", description = "ModelPro site content and admin API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// Single, cloneable container for everything a request may need. Handlers and
/// extractors pull the pieces they use through the `FromRef` impls below.
#[derive(Clone)]
pub struct AppState {
    /// Persistence layer: Postgres or the in-memory store.
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing tree, applies the guards and observability layers, and
/// registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No guard.
        .merge(public::public_routes())
        // Authenticated Routes: API guard, 401 before the handler runs.
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_session,
            )),
        )
        // Admin UI: page guard, redirects to the login page.
        .merge(admin::admin_routes(state.clone()))
        .with_state(state);

    // 3. Observability and Correlation Layers
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID Generation: a UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request Tracing: one span per request, carrying the request ID.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID Propagation: echo x-request-id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the `http_request` span for `TraceLayer`, so every log line of a request
/// is correlated by its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
