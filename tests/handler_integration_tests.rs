use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use modelpro_backend::{
    AppState,
    auth::{AdminSession, OptionalAdminSession},
    config::AppConfig,
    documents::{SingletonKind, StoredDocument},
    handlers::{self, ApiJson, ApiPath},
    models::{
        AdminRecord, CreateOrderRequest, CreatePortfolioRequest, CreateServiceRequest,
        DashboardStats, LoginRequest, Order, PortfolioImage, RegisterAdminRequest, Service,
        UpdateOrderRequest, UpdatePortfolioRequest, UpdateServiceRequest,
    },
    repository::{Repository, RepositoryError},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::test;
use uuid::Uuid;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// Canned outputs in, recorded inputs out. `fail` turns every call into a
// database error so the 500 path can be exercised.
#[derive(Default)]
pub struct MockRepoControl {
    pub fail: bool,
    pub service_to_return: Option<Service>,
    pub order_to_return: Option<Order>,
    pub delete_result: bool,
    pub admin_count: i64,
    pub admin_conflict: bool,
    // Another request created the first admin after `count_admins` ran.
    pub first_admin_taken: bool,
    pub admins_to_return: Vec<AdminRecord>,
    pub stats_to_return: DashboardStats,

    pub created_service: Mutex<Option<CreateServiceRequest>>,
    pub created_admin: Mutex<Option<(String, String, String)>>,
}

impl MockRepoControl {
    fn check(&self) -> Result<(), RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn list_services(&self) -> Result<Vec<Service>, RepositoryError> {
        self.check()?;
        Ok(self.service_to_return.clone().into_iter().collect())
    }
    async fn get_service(&self, _id: Uuid) -> Result<Option<Service>, RepositoryError> {
        self.check()?;
        Ok(self.service_to_return.clone())
    }
    async fn create_service(&self, req: CreateServiceRequest) -> Result<Service, RepositoryError> {
        self.check()?;
        let service = Service {
            name: req.name.clone(),
            price: req.price.unwrap_or_default(),
            ..Service::default()
        };
        *self.created_service.lock().unwrap() = Some(req);
        Ok(service)
    }
    async fn update_service(
        &self,
        _id: Uuid,
        _req: UpdateServiceRequest,
    ) -> Result<Option<Service>, RepositoryError> {
        self.check()?;
        Ok(self.service_to_return.clone())
    }
    async fn delete_service(&self, _id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.delete_result)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        self.check()?;
        Ok(self.order_to_return.clone().into_iter().collect())
    }
    async fn get_order(&self, _id: Uuid) -> Result<Option<Order>, RepositoryError> {
        self.check()?;
        Ok(self.order_to_return.clone())
    }
    async fn create_order(&self, _req: CreateOrderRequest) -> Result<Order, RepositoryError> {
        self.check()?;
        Ok(Order::default())
    }
    async fn update_order(
        &self,
        _id: Uuid,
        req: UpdateOrderRequest,
    ) -> Result<Option<Order>, RepositoryError> {
        self.check()?;
        Ok(self.order_to_return.clone().map(|mut order| {
            if let Some(status) = req.status {
                order.status = status;
            }
            order
        }))
    }
    async fn delete_order(&self, _id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.delete_result)
    }

    async fn list_portfolio(&self) -> Result<Vec<PortfolioImage>, RepositoryError> {
        self.check()?;
        Ok(vec![])
    }
    async fn create_portfolio_image(
        &self,
        _req: CreatePortfolioRequest,
    ) -> Result<PortfolioImage, RepositoryError> {
        self.check()?;
        Ok(PortfolioImage::default())
    }
    async fn update_portfolio_image(
        &self,
        _id: Uuid,
        _req: UpdatePortfolioRequest,
    ) -> Result<Option<PortfolioImage>, RepositoryError> {
        self.check()?;
        Ok(None)
    }
    async fn delete_portfolio_image(&self, _id: Uuid) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.delete_result)
    }

    async fn count_admins(&self) -> Result<i64, RepositoryError> {
        self.check()?;
        Ok(self.admin_count)
    }
    async fn find_admin(&self, _id: Uuid) -> Result<Option<AdminRecord>, RepositoryError> {
        self.check()?;
        Ok(self.admins_to_return.first().cloned())
    }
    async fn find_admin_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        self.check()?;
        Ok(self.admins_to_return.iter().find(|a| a.email == email).cloned())
    }
    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminRecord, RepositoryError> {
        self.check()?;
        if self.admin_conflict {
            return Err(RepositoryError::Conflict("duplicate".to_string()));
        }
        *self.created_admin.lock().unwrap() = Some((
            username.to_string(),
            email.to_string(),
            password_hash.to_string(),
        ));
        Ok(AdminRecord {
            id: TEST_ADMIN_ID,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            ..AdminRecord::default()
        })
    }
    async fn create_first_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        if self.admin_count > 0 || self.first_admin_taken {
            self.check()?;
            return Ok(None);
        }
        self.create_admin(username, email, password_hash)
            .await
            .map(Some)
    }
    async fn list_admins(&self) -> Result<Vec<AdminRecord>, RepositoryError> {
        self.check()?;
        Ok(self.admins_to_return.clone())
    }

    async fn get_stats(&self) -> Result<DashboardStats, RepositoryError> {
        self.check()?;
        Ok(self.stats_to_return.clone())
    }

    // Documents are covered by the bootstrap tests against the in-memory store.
    async fn find_document(
        &self,
        _kind: SingletonKind,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        self.check()?;
        Ok(None)
    }
    async fn insert_document_if_absent(
        &self,
        _kind: SingletonKind,
        body: Value,
    ) -> Result<StoredDocument, RepositoryError> {
        self.check()?;
        Ok(stored(body))
    }
    async fn replace_document(
        &self,
        _kind: SingletonKind,
        body: Value,
    ) -> Result<StoredDocument, RepositoryError> {
        self.check()?;
        Ok(stored(body))
    }
}

fn stored(body: Value) -> StoredDocument {
    StoredDocument {
        id: TEST_ID,
        body: sqlx::types::Json(body),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

// --- TEST UTILITIES ---

const TEST_ID: Uuid = Uuid::from_u128(123);
const TEST_ADMIN_ID: Uuid = Uuid::from_u128(456);

fn create_test_state(repo_control: MockRepoControl) -> (AppState, Arc<MockRepoControl>) {
    let repo = Arc::new(repo_control);
    let state = AppState {
        repo: repo.clone(),
        config: AppConfig::default(),
    };
    (state, repo)
}

fn admin_session() -> AdminSession {
    AdminSession {
        id: TEST_ADMIN_ID,
        email: "owner@example.com".to_string(),
        username: "owner".to_string(),
    }
}

async fn into_parts(response: Response) -> (StatusCode, Value) {
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    (parts.status, serde_json::from_slice(&bytes).unwrap())
}

// --- HANDLER TESTS ---

#[test]
async fn test_get_service_success_uses_envelope() {
    let service = Service {
        id: TEST_ID,
        name: "Runway".to_string(),
        ..Service::default()
    };
    let (state, _) = create_test_state(MockRepoControl {
        service_to_return: Some(service),
        ..MockRepoControl::default()
    });

    let result = handlers::services::get_service(State(state), ApiPath(TEST_ID)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], TEST_ID.to_string());
    assert_eq!(body["data"]["name"], "Runway");
}

#[test]
async fn test_get_service_not_found() {
    let (state, _) = create_test_state(MockRepoControl::default());

    let result = handlers::services::get_service(State(state), ApiPath(TEST_ID)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "success": false, "error": "Service not found" }));
}

#[test]
async fn test_create_service_passes_normalized_payload() {
    let (state, repo) = create_test_state(MockRepoControl::default());

    let payload = CreateServiceRequest {
        name: "  Editorial shoot  ".to_string(),
        description: "Studio day".to_string(),
        price: Some(450.0),
        images: vec![],
        details: "Two looks".to_string(),
    };
    let result = handlers::services::create_service(State(state), ApiJson(payload)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Editorial shoot");
    let recorded = repo.created_service.lock().unwrap().clone().unwrap();
    assert_eq!(recorded.name, "Editorial shoot");
}

#[test]
async fn test_create_service_without_price_never_reaches_repository() {
    let (state, repo) = create_test_state(MockRepoControl::default());

    let payload = CreateServiceRequest {
        name: "Runway".to_string(),
        description: "Show".to_string(),
        price: None,
        images: vec![],
        details: "Details".to_string(),
    };
    let result = handlers::services::create_service(State(state), ApiJson(payload)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Price is required");
    assert!(repo.created_service.lock().unwrap().is_none());
}

#[test]
async fn test_delete_service_returns_empty_object() {
    let (state, _) = create_test_state(MockRepoControl {
        delete_result: true,
        ..MockRepoControl::default()
    });

    let result = handlers::services::delete_service(State(state), ApiPath(TEST_ID)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": {} }));
}

#[test]
async fn test_delete_order_not_found() {
    let (state, _) = create_test_state(MockRepoControl::default());

    let result = handlers::orders::delete_order(State(state), ApiPath(TEST_ID)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");
}

#[test]
async fn test_update_order_requires_a_field() {
    let (state, _) = create_test_state(MockRepoControl {
        order_to_return: Some(Order::default()),
        ..MockRepoControl::default()
    });

    let result = handlers::orders::update_order(
        State(state),
        ApiPath(TEST_ID),
        ApiJson(UpdateOrderRequest::default()),
    )
    .await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Nothing to update");
}

#[test]
async fn test_repository_failure_is_a_generic_500() {
    let (state, _) = create_test_state(MockRepoControl {
        fail: true,
        ..MockRepoControl::default()
    });

    let result = handlers::services::list_services(State(state)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "success": false, "error": "Internal server error" })
    );
}

#[test]
async fn test_first_admin_registration_is_open() {
    let (state, repo) = create_test_state(MockRepoControl::default());

    let payload = RegisterAdminRequest {
        username: " owner ".to_string(),
        email: "Owner@Example.com".to_string(),
        password: "s3cret".to_string(),
    };
    let result = handlers::admin::register_admin(
        State(state),
        OptionalAdminSession(None),
        ApiJson(payload),
    )
    .await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body["data"],
        json!({ "id": TEST_ADMIN_ID.to_string(), "username": "owner", "email": "owner@example.com" })
    );

    let (_, _, hash) = repo.created_admin.lock().unwrap().clone().unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert_ne!(hash, "s3cret");
}

#[test]
async fn test_registration_requires_session_once_admins_exist() {
    let (state, repo) = create_test_state(MockRepoControl {
        admin_count: 1,
        ..MockRepoControl::default()
    });

    let payload = RegisterAdminRequest {
        username: "second".to_string(),
        email: "second@example.com".to_string(),
        password: "pw".to_string(),
    };
    let result = handlers::admin::register_admin(
        State(state),
        OptionalAdminSession(None),
        ApiJson(payload),
    )
    .await;
    let (status, _) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(repo.created_admin.lock().unwrap().is_none());
}

#[test]
async fn test_anonymous_registration_losing_the_first_admin_race() {
    // The store was empty when counted, but another request won the insert.
    let (state, repo) = create_test_state(MockRepoControl {
        first_admin_taken: true,
        ..MockRepoControl::default()
    });

    let payload = RegisterAdminRequest {
        username: "late".to_string(),
        email: "late@example.com".to_string(),
        password: "pw".to_string(),
    };
    let result = handlers::admin::register_admin(
        State(state),
        OptionalAdminSession(None),
        ApiJson(payload),
    )
    .await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert!(repo.created_admin.lock().unwrap().is_none());
}

#[test]
async fn test_signed_in_registration_skips_the_first_admin_gate() {
    let (state, repo) = create_test_state(MockRepoControl {
        admin_count: 1,
        first_admin_taken: true,
        ..MockRepoControl::default()
    });

    let payload = RegisterAdminRequest {
        username: "editor".to_string(),
        email: "editor@example.com".to_string(),
        password: "pw".to_string(),
    };
    let result = handlers::admin::register_admin(
        State(state),
        OptionalAdminSession(Some(admin_session())),
        ApiJson(payload),
    )
    .await;
    let (status, _) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(repo.created_admin.lock().unwrap().is_some());
}

#[test]
async fn test_duplicate_admin_is_a_bad_request() {
    let (state, _) = create_test_state(MockRepoControl {
        admin_count: 1,
        admin_conflict: true,
        ..MockRepoControl::default()
    });

    let payload = RegisterAdminRequest {
        username: "owner".to_string(),
        email: "owner@example.com".to_string(),
        password: "pw".to_string(),
    };
    let result = handlers::admin::register_admin(
        State(state),
        OptionalAdminSession(Some(admin_session())),
        ApiJson(payload),
    )
    .await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Admin already exists");
}

#[test]
async fn test_list_admins_never_exposes_password_hash() {
    let (state, _) = create_test_state(MockRepoControl {
        admins_to_return: vec![AdminRecord {
            id: TEST_ADMIN_ID,
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            ..AdminRecord::default()
        }],
        ..MockRepoControl::default()
    });

    let result = handlers::admin::list_admins(State(state)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["username"], "owner");
    assert!(body["data"][0].get("passwordHash").is_none());
    assert!(!body.to_string().contains("argon2"));
}

#[test]
async fn test_get_admin_stats() {
    let (state, _) = create_test_state(MockRepoControl {
        stats_to_return: DashboardStats {
            total_services: 3,
            total_orders: 7,
            pending_orders: 2,
        },
        ..MockRepoControl::default()
    });

    let result = handlers::admin::get_admin_stats(State(state)).await;
    let (_, body) = into_parts(result.into_response()).await;

    assert_eq!(
        body["data"],
        json!({ "totalServices": 3, "totalOrders": 7, "pendingOrders": 2 })
    );
}

#[test]
async fn test_get_session_returns_current_admin() {
    let result = handlers::admin::get_session(admin_session()).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "owner@example.com");
}

#[test]
async fn test_login_with_unknown_email_is_unauthorized() {
    let (state, _) = create_test_state(MockRepoControl::default());

    let payload = LoginRequest {
        email: "nobody@example.com".to_string(),
        password: "pw".to_string(),
    };
    let result = handlers::admin::login(State(state), ApiJson(payload)).await;
    let (status, body) = into_parts(result.into_response()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}
