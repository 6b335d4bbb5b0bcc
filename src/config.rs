use std::env;

/// Fallback session signing secret used outside production.
const LOCAL_SESSION_SECRET: &str = "modelpro-local-session-secret-change-me";

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and
/// shared with handlers and extractors through `FromRef<AppState>`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Postgres connection string. `None` selects the in-memory store (local only).
    pub db_url: Option<String>,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Directory holding the prebuilt admin UI assets served under `/admin`.
    pub admin_ui_dir: String,
    // Runtime environment marker. Controls cookie hardening and log format.
    pub env: Env,
    // HMAC secret used to sign and verify session tokens.
    pub session_secret: String,
}

/// Env
///
/// Runtime context. Production switches session cookies to the `__Secure-`
/// prefixed, `Secure`-flagged variant and emits JSON logs.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe, non-panicking configuration for test state setup.
    fn default() -> Self {
        Self {
            db_url: None,
            bind_addr: "127.0.0.1:3000".to_string(),
            admin_ui_dir: "admin-ui".to_string(),
            env: Env::Local,
            session_secret: LOCAL_SESSION_SECRET.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics in production when `DATABASE_URL` or `SESSION_SECRET` is missing, so the
    /// service never starts with an in-memory store or a guessable signing key.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let session_secret = match env {
            Env::Production => env::var("SESSION_SECRET")
                .expect("FATAL: SESSION_SECRET must be set in production."),
            Env::Local => {
                env::var("SESSION_SECRET").unwrap_or_else(|_| LOCAL_SESSION_SECRET.to_string())
            }
        };

        let db_url = match env {
            Env::Production => Some(
                env::var("DATABASE_URL").expect("FATAL: DATABASE_URL required in prod"),
            ),
            Env::Local => env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
        };

        Self {
            db_url,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            admin_ui_dir: env::var("ADMIN_UI_DIR").unwrap_or_else(|_| "admin-ui".to_string()),
            env,
            session_secret,
        }
    }

    pub fn is_production(&self) -> bool {
        self.env.is_production()
    }
}

impl Env {
    pub fn is_production(&self) -> bool {
        *self == Env::Production
    }
}
