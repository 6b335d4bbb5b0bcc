use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::{ApiJson, ApiResult, CreatedResult, created, ok};
use crate::{
    AppState,
    auth::{AdminSession, OptionalAdminSession, verify_credentials},
    error::ApiError,
    models::{AdminProfile, AdminSummary, DashboardStats, LoginRequest, RegisterAdminRequest},
    password::hash_password,
    repository::RepositoryError,
    session,
};

impl From<AdminSession> for AdminSummary {
    fn from(session: AdminSession) -> Self {
        Self {
            id: session.id,
            username: session.username,
            email: session.email,
        }
    }
}

/// login
///
/// [Public Route] Verifies credentials and sets the session cookie. Unknown email
/// and wrong password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in, session cookie set", body = AdminSummary),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let admin = verify_credentials(state.repo.as_ref(), &payload.email, &payload.password).await?;

    let token = session::issue_token(&admin, &state.config.session_secret)
        .map_err(|e| ApiError::Internal(format!("failed to sign session token: {e}")))?;
    let cookie = session::session_cookie(&token, &state.config.env)
        .map_err(|e| ApiError::Internal(format!("invalid session cookie: {e}")))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        ok(AdminSummary::from(admin)),
    )
        .into_response())
}

/// logout
///
/// [Public Route] Expires the session cookie. Safe to call without a session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Session cookie cleared"))
)]
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cookie = session::clear_session_cookie(&state.config.env)
        .map_err(|e| ApiError::Internal(format!("invalid session cookie: {e}")))?;

    Ok(([(header::SET_COOKIE, cookie)], ok(json!({}))).into_response())
}

/// get_session
///
/// [Authenticated Route] The admin behind the current session.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current admin", body = AdminSummary),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_session(session: AdminSession) -> ApiResult<AdminSummary> {
    Ok(ok(AdminSummary::from(session)))
}

/// register_admin
///
/// Creates an admin account. Open to anyone while no admin exists, so the first
/// account can be bootstrapped; afterwards a valid session is required.
///
/// Anonymous requests go through `create_first_admin`, which re-checks the empty
/// store atomically: of two racing first registrations, one gets 401.
#[utoipa::path(
    post,
    path = "/api/admin/register",
    tag = "admin",
    request_body = RegisterAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = AdminSummary),
        (status = 400, description = "Missing field or admin already exists"),
        (status = 401, description = "Admins exist and no valid session")
    )
)]
pub async fn register_admin(
    State(state): State<AppState>,
    OptionalAdminSession(session): OptionalAdminSession,
    ApiJson(payload): ApiJson<RegisterAdminRequest>,
) -> CreatedResult<AdminSummary> {
    if session.is_none() && state.repo.count_admins().await? > 0 {
        return Err(ApiError::unauthorized());
    }

    let payload = payload.validate()?;
    let password_hash =
        hash_password(&payload.password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let (username, email) = (&payload.username, &payload.email);
    let inserted = match session {
        Some(_) => state
            .repo
            .create_admin(username, email, &password_hash)
            .await
            .map(Some),
        None => {
            state
                .repo
                .create_first_admin(username, email, &password_hash)
                .await
        }
    };

    let admin = inserted
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => ApiError::bad_request("Admin already exists"),
            other => ApiError::from(other),
        })?
        .ok_or_else(ApiError::unauthorized)?;

    tracing::info!(
        admin_id = %admin.id,
        created_by = ?session.map(|s| s.id),
        "admin registered"
    );
    Ok(created(AdminSummary::from(admin)))
}

/// list_admins
///
/// [Authenticated Route] All admin accounts, newest first, without password hashes.
#[utoipa::path(
    get,
    path = "/api/admins",
    tag = "admin",
    responses((status = 200, description = "Admins", body = [AdminProfile]))
)]
pub async fn list_admins(State(state): State<AppState>) -> ApiResult<Vec<AdminProfile>> {
    let admins = state.repo.list_admins().await?;
    Ok(ok(admins.into_iter().map(AdminProfile::from).collect()))
}

/// get_admin_stats
///
/// [Authenticated Route] Dashboard counters.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    responses((status = 200, description = "Counters", body = DashboardStats))
)]
pub async fn get_admin_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    Ok(ok(state.repo.get_stats().await?))
}
