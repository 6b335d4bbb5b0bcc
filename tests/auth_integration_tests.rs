use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use chrono::Utc;
use modelpro_backend::{
    AppState,
    auth::{AdminSession, OptionalAdminSession, verify_credentials},
    config::{AppConfig, Env},
    memory::InMemoryRepository,
    models::AdminRecord,
    password::hash_password,
    repository::Repository,
    session::{self, SESSION_MAX_AGE_SECS},
};
use std::sync::Arc;
use uuid::Uuid;

// --- Helper Functions ---

const TEST_SECRET: &str = "test-secret-value-1234567890";
const TEST_PASSWORD: &str = "correct horse battery staple";

struct Fixture {
    state: AppState,
    repo: Arc<InMemoryRepository>,
    admin: AdminRecord,
}

async fn fixture(env: Env) -> Fixture {
    let repo = Arc::new(InMemoryRepository::new());
    let hash = hash_password(TEST_PASSWORD).unwrap();
    let admin = repo
        .create_admin("owner", "owner@example.com", &hash)
        .await
        .unwrap();

    let mut config = AppConfig::default();
    config.env = env;
    config.session_secret = TEST_SECRET.to_string();

    Fixture {
        state: AppState {
            repo: repo.clone(),
            config,
        },
        repo,
        admin,
    }
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn parts_with_cookie(name: &str, token: &str) -> Parts {
    let mut parts = get_request_parts(Method::POST, "/api/services".parse().unwrap());
    parts.headers.insert(
        header::COOKIE,
        header::HeaderValue::from_str(&format!("{name}={token}")).unwrap(),
    );
    parts
}

// --- Session Guard ---

#[tokio::test]
async fn test_session_from_valid_cookie() {
    let fx = fixture(Env::Local).await;
    let token = session::issue_token(&fx.admin, TEST_SECRET).unwrap();

    let mut parts = parts_with_cookie("session-token", &token);
    let session = AdminSession::from_request_parts(&mut parts, &fx.state)
        .await
        .unwrap();

    assert_eq!(session.id, fx.admin.id);
    assert_eq!(session.email, "owner@example.com");
    assert_eq!(session.username, "owner");
}

#[tokio::test]
async fn test_session_from_quoted_cookie_value() {
    let fx = fixture(Env::Local).await;
    let token = session::issue_token(&fx.admin, TEST_SECRET).unwrap();

    let mut parts = parts_with_cookie("session-token", &format!("\"{token}\""));
    let session = AdminSession::from_request_parts(&mut parts, &fx.state)
        .await
        .unwrap();

    assert_eq!(session.id, fx.admin.id);
}

#[tokio::test]
async fn test_session_from_bearer_header() {
    let fx = fixture(Env::Local).await;
    let token = session::issue_token(&fx.admin, TEST_SECRET).unwrap();

    let mut parts = get_request_parts(Method::GET, "/api/orders".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );

    let session = AdminSession::from_request_parts(&mut parts, &fx.state).await;
    assert_eq!(session.unwrap().id, fx.admin.id);
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let fx = fixture(Env::Local).await;
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());

    let err = AdminSession::from_request_parts(&mut parts, &fx.state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_within_thirty_days_is_accepted() {
    let fx = fixture(Env::Local).await;
    // Issued 29 days ago.
    let issued = Utc::now().timestamp() - SESSION_MAX_AGE_SECS + 24 * 60 * 60;
    let token = session::issue_token_at(&fx.admin, TEST_SECRET, issued).unwrap();

    let mut parts = parts_with_cookie("session-token", &token);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_token_older_than_thirty_days_is_rejected() {
    let fx = fixture(Env::Local).await;
    // Issued 31 days ago.
    let issued = Utc::now().timestamp() - SESSION_MAX_AGE_SECS - 24 * 60 * 60;
    let token = session::issue_token_at(&fx.admin, TEST_SECRET, issued).unwrap();

    let mut parts = parts_with_cookie("session-token", &token);
    let err = AdminSession::from_request_parts(&mut parts, &fx.state)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let fx = fixture(Env::Local).await;
    let token = session::issue_token(&fx.admin, TEST_SECRET).unwrap();

    // Flip the first character of the signature segment.
    let (signed, signature) = token.rsplit_once('.').unwrap();
    let first = signature.chars().next().unwrap();
    let replacement = if first == 'A' { 'B' } else { 'A' };
    let tampered = format!("{signed}.{replacement}{}", &signature[1..]);

    let mut parts = parts_with_cookie("session-token", &tampered);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_err()
    );

    // Signed with another secret.
    let forged = session::issue_token(&fx.admin, "not-the-server-secret").unwrap();
    let mut parts = parts_with_cookie("session-token", &forged);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_token_for_unknown_admin_is_rejected() {
    let fx = fixture(Env::Local).await;
    let ghost = AdminRecord {
        id: Uuid::new_v4(),
        email: "ghost@example.com".to_string(),
        ..Default::default()
    };
    let token = session::issue_token(&ghost, TEST_SECRET).unwrap();

    let mut parts = parts_with_cookie("session-token", &token);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_production_reads_only_the_secure_cookie() {
    let fx = fixture(Env::Production).await;
    let token = session::issue_token(&fx.admin, TEST_SECRET).unwrap();

    let mut parts = parts_with_cookie("session-token", &token);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_err()
    );

    let mut parts = parts_with_cookie("__Secure-session-token", &token);
    assert!(
        AdminSession::from_request_parts(&mut parts, &fx.state)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_optional_session_never_rejects_bad_tokens() {
    let fx = fixture(Env::Local).await;

    let mut parts = parts_with_cookie("session-token", "garbage");
    let OptionalAdminSession(session) = OptionalAdminSession::from_request_parts(&mut parts, &fx.state)
        .await
        .unwrap();
    assert!(session.is_none());
}

// --- Credential Verification ---

#[tokio::test]
async fn test_verify_credentials_success_normalizes_email() {
    let fx = fixture(Env::Local).await;

    let admin = verify_credentials(fx.repo.as_ref(), "  Owner@Example.COM ", TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(admin.id, fx.admin.id);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_fail_identically() {
    let fx = fixture(Env::Local).await;

    let wrong_password = verify_credentials(fx.repo.as_ref(), "owner@example.com", "nope")
        .await
        .unwrap_err();
    let unknown_email = verify_credentials(fx.repo.as_ref(), "nobody@example.com", "nope")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert_eq!(wrong_password.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn test_missing_credentials_are_a_bad_request() {
    let fx = fixture(Env::Local).await;

    let err = verify_credentials(fx.repo.as_ref(), "", TEST_PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = verify_credentials(fx.repo.as_ref(), "owner@example.com", "")
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

// --- First Admin ---

#[tokio::test]
async fn test_concurrent_first_admin_registrations_create_one_admin() {
    let repo = Arc::new(InMemoryRepository::new());

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move {
                repo.create_first_admin(
                    &format!("owner{i}"),
                    &format!("owner{i}@example.com"),
                    "$argon2id$placeholder",
                )
                .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_some() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(repo.count_admins().await.unwrap(), 1);
}

#[tokio::test]
async fn test_first_admin_gate_closes_once_an_admin_exists() {
    let fx = fixture(Env::Local).await;

    let second = fx
        .repo
        .create_first_admin("intruder", "intruder@example.com", "$argon2id$placeholder")
        .await
        .unwrap();

    assert!(second.is_none());
    assert_eq!(fx.repo.count_admins().await.unwrap(), 1);
}
