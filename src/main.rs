use modelpro_backend::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    memory::InMemoryRepository,
    repository::{PostgresRepository, RepositoryState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: loads configuration, installs logging, picks the store, and serves
/// the router until the process is stopped.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    // RUST_LOG wins; otherwise debug for this crate and request logs from tower-http.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "modelpro_backend=debug,tower_http=info".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Store Initialization
    // The pool connects lazily: the first query opens the connection and later
    // requests reuse it. Migrations run up front so a bad DATABASE_URL fails here.
    let repo: RepositoryState = match &config.db_url {
        Some(db_url) => {
            let postgres = PostgresRepository::connect_lazy(db_url)
                .expect("FATAL: DATABASE_URL is not a valid Postgres connection string.");
            postgres
                .migrate()
                .await
                .expect("FATAL: Failed to apply migrations. Check DATABASE_URL.");
            tracing::info!("Postgres store ready, migrations applied.");
            Arc::new(postgres)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store. Data is lost on exit.");
            Arc::new(InMemoryRepository::new())
        }
    };

    let bind_addr = config.bind_addr.clone();
    let admin_ui_dir = config.admin_ui_dir.clone();

    // 5. Unified State Assembly
    let app_state = AppState { repo, config };

    // 6. Router and Server Startup
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind BIND_ADDR.");

    tracing::info!("Listening on {bind_addr}");
    tracing::info!("Serving admin UI from {admin_ui_dir} under /admin");
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
