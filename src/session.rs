//! Signed session tokens and the cookie that carries them.

use axum::http::{HeaderMap, HeaderValue, header, header::InvalidHeaderValue};
use chrono::Utc;
use cookie::{Cookie, SameSite, time::Duration};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::Env, models::AdminRecord};

/// A session is valid for 30 days after login.
pub const SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

const LOCAL_COOKIE: &str = "session-token";
const SECURE_COOKIE: &str = "__Secure-session-token";

/// Claims
///
/// Payload of the HS256 session token. `exp` is always `iat + SESSION_MAX_AGE_SECS`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signs a fresh 30-day token for `admin`.
pub fn issue_token(admin: &AdminRecord, secret: &str) -> Result<String, errors::Error> {
    issue_token_at(admin, secret, Utc::now().timestamp())
}

/// Signs a token as if issued at `issued_at` (unix seconds).
pub fn issue_token_at(
    admin: &AdminRecord,
    secret: &str,
    issued_at: i64,
) -> Result<String, errors::Error> {
    let claims = Claims {
        sub: admin.id,
        email: admin.email.clone(),
        iat: issued_at.max(0) as usize,
        exp: (issued_at + SESSION_MAX_AGE_SECS).max(0) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verifies signature and expiry. No leeway: a token is dead the second it expires.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, errors::Error> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Cookie name for the environment. Production uses the `__Secure-` prefix.
pub fn cookie_name(env: &Env) -> &'static str {
    match env {
        Env::Production => SECURE_COOKIE,
        Env::Local => LOCAL_COOKIE,
    }
}

/// `Set-Cookie` value storing `token`.
pub fn session_cookie(token: &str, env: &Env) -> Result<HeaderValue, InvalidHeaderValue> {
    let cookie = Cookie::build((cookie_name(env), token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(SESSION_MAX_AGE_SECS))
        .secure(env.is_production())
        .build();
    HeaderValue::from_str(&cookie.to_string())
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn clear_session_cookie(env: &Env) -> Result<HeaderValue, InvalidHeaderValue> {
    let cookie = Cookie::build(cookie_name(env))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(env.is_production())
        .removal()
        .build();
    HeaderValue::from_str(&cookie.to_string())
}

/// Pulls the raw token from the session cookie, falling back to an
/// `Authorization: Bearer` header. Quoted cookie values are unquoted.
pub fn token_from_headers(headers: &HeaderMap, env: &Env) -> Option<String> {
    let name = cookie_name(env);

    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value_trimmed().is_empty())
        .map(|cookie| cookie.value_trimmed().to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    })
}
