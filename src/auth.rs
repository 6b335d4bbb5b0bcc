use axum::{
    extract::{FromRef, FromRequestParts, OriginalUri, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::{
    AppState,
    config::AppConfig,
    error::ApiError,
    models::AdminRecord,
    password::{verify_dummy, verify_password},
    repository::{Repository, RepositoryState},
    session,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Admin UI sections that require a session. Other paths under `/admin` are
/// bundle assets and stay public so the login page can load them.
const GUARDED_SECTIONS: [&str; 8] = [
    "dashboard",
    "services",
    "orders",
    "portfolio",
    "settings",
    "users",
    "about",
    "contact",
];

/// AdminSession
///
/// The resolved identity behind a valid session token. Only produced when the
/// token verifies, has not expired, and its admin still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminSession {
    pub id: Uuid,
    pub email: String,
    pub username: String,
}

impl From<AdminRecord> for AdminSession {
    fn from(admin: AdminRecord) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            username: admin.username,
        }
    }
}

/// resolve_session
///
/// The single authorization predicate shared by the API guard and the page guard.
/// `Ok(None)` means "no valid session"; `Err` only surfaces repository failures.
pub async fn resolve_session(
    headers: &HeaderMap,
    repo: &dyn Repository,
    config: &AppConfig,
) -> Result<Option<AdminSession>, ApiError> {
    let Some(token) = session::token_from_headers(headers, &config.env) else {
        return Ok(None);
    };

    let claims = match session::decode_token(&token, &config.session_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = ?e.kind(), "rejected session token");
            return Ok(None);
        }
    };

    // A token outlives a deleted admin; the lookup closes that gap.
    let admin = repo.find_admin(claims.sub).await?;
    if admin.is_none() {
        tracing::debug!(admin_id = %claims.sub, "session token for unknown admin");
    }
    Ok(admin.map(AdminSession::from))
}

/// AdminSession Extractor Implementation
///
/// Reuses the session stored by [`require_session`] when present, otherwise resolves
/// it from the request headers. Rejects with 401 `{"success": false, "error": "Unauthorized"}`.
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(session.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        resolve_session(&parts.headers, repo.as_ref(), &config)
            .await?
            .ok_or_else(ApiError::unauthorized)
    }
}

/// OptionalAdminSession
///
/// Like [`AdminSession`] but never rejects for a missing or invalid token. Used by
/// endpoints whose guard depends on store state (first-admin registration).
#[derive(Debug, Clone)]
pub struct OptionalAdminSession(pub Option<AdminSession>);

impl<S> FromRequestParts<S> for OptionalAdminSession
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<AdminSession>() {
            return Ok(Self(Some(session.clone())));
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        Ok(Self(
            resolve_session(&parts.headers, repo.as_ref(), &config).await?,
        ))
    }
}

/// require_session
///
/// API guard applied with `route_layer` to every mutating or private endpoint.
/// Extracting [`AdminSession`] rejects with 401 before the handler runs; on success
/// the session is stashed in the request extensions for the handler to reuse.
pub async fn require_session(session: AdminSession, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(session);
    next.run(request).await
}

/// page_guard
///
/// UI guard for the `/admin` tree. Anonymous visitors of a guarded section are sent
/// to `/admin/login?from=<path and query>`; signed-in visitors of the login page are
/// sent to the dashboard.
pub async fn page_guard(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = uri.path();
    let is_login_page = path.starts_with("/admin/login");

    if !is_login_page && !is_guarded_page(path) {
        return Ok(next.run(request).await);
    }

    let session = resolve_session(request.headers(), state.repo.as_ref(), &state.config).await?;

    match (is_login_page, session) {
        (true, Some(_)) => Ok(Redirect::temporary("/admin/dashboard").into_response()),
        (true, None) | (false, Some(_)) => Ok(next.run(request).await),
        (false, None) => {
            let from = match uri.query() {
                Some(query) => format!("{path}?{query}"),
                None => path.to_string(),
            };
            Ok(Redirect::temporary(&login_redirect(&from)).into_response())
        }
    }
}

fn is_guarded_page(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("/admin") else {
        return false;
    };
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        return true;
    }
    let section = rest.split('/').next().unwrap_or_default();
    GUARDED_SECTIONS.contains(&section)
}

/// Login URL carrying the percent-encoded original location.
pub fn login_redirect(from: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(from.as_bytes()).collect();
    format!("/admin/login?from={encoded}")
}

/// verify_credentials
///
/// Looks up the admin by normalized email and checks the password against the
/// stored hash. Unknown email and wrong password fail identically, and the unknown
/// email branch still pays for one hash verification.
///
/// Failures are logged with their reason only; the submitted email and password
/// never reach the logs.
pub async fn verify_credentials(
    repo: &dyn Repository,
    email: &str,
    password: &str,
) -> Result<AdminRecord, ApiError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Please enter email and password"));
    }

    match repo.find_admin_by_email(&email).await? {
        Some(admin) if verify_password(password, &admin.password_hash) => {
            tracing::info!(admin_id = %admin.id, "admin signed in");
            Ok(admin)
        }
        Some(admin) => {
            tracing::warn!(admin_id = %admin.id, "sign-in failed: wrong password");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
        None => {
            verify_dummy(password);
            tracing::warn!("sign-in failed: no matching admin");
            Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))
        }
    }
}
