use crate::documents::{SingletonKind, StoredDocument};
use crate::models::{
    AdminRecord, CreateOrderRequest, CreatePortfolioRequest, CreateServiceRequest, DashboardStats,
    Order, OrderStatus, PortfolioImage, Service, UpdateOrderRequest, UpdatePortfolioRequest,
    UpdateServiceRequest,
};
use async_trait::async_trait;
use sqlx::{PgPool, postgres::PgPoolOptions, types::Json};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by a [`Repository`] implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying database call failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    let is_unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
    if is_unique {
        RepositoryError::Conflict(what.to_string())
    } else {
        RepositoryError::Database(err)
    }
}

/// Repository Trait
///
/// Abstract contract for all persistence operations, so handlers never know whether
/// they talk to Postgres or the in-memory store.
///
/// Request payloads reach the repository already validated and normalized.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Services ---
    // Newest first.
    async fn list_services(&self) -> Result<Vec<Service>, RepositoryError>;
    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, RepositoryError>;
    async fn create_service(&self, req: CreateServiceRequest) -> Result<Service, RepositoryError>;
    // Only fields that are `Some` change. `None` when the id is unknown.
    async fn update_service(
        &self,
        id: Uuid,
        req: UpdateServiceRequest,
    ) -> Result<Option<Service>, RepositoryError>;
    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Orders ---
    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError>;
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepositoryError>;
    async fn update_order(
        &self,
        id: Uuid,
        req: UpdateOrderRequest,
    ) -> Result<Option<Order>, RepositoryError>;
    async fn delete_order(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Portfolio ---
    // Ordered by `order` ascending, then newest first.
    async fn list_portfolio(&self) -> Result<Vec<PortfolioImage>, RepositoryError>;
    async fn create_portfolio_image(
        &self,
        req: CreatePortfolioRequest,
    ) -> Result<PortfolioImage, RepositoryError>;
    async fn update_portfolio_image(
        &self,
        id: Uuid,
        req: UpdatePortfolioRequest,
    ) -> Result<Option<PortfolioImage>, RepositoryError>;
    async fn delete_portfolio_image(&self, id: Uuid) -> Result<bool, RepositoryError>;

    // --- Admins ---
    async fn count_admins(&self) -> Result<i64, RepositoryError>;
    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminRecord>, RepositoryError>;
    // `email` is expected lowercased.
    async fn find_admin_by_email(&self, email: &str)
    -> Result<Option<AdminRecord>, RepositoryError>;
    // Fails with `Conflict` when the username or email is taken.
    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminRecord, RepositoryError>;
    /// Like `create_admin`, but only while no admin exists at all. `None` when an
    /// admin already exists. Concurrent calls on an empty store create one admin.
    async fn create_first_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError>;
    async fn list_admins(&self) -> Result<Vec<AdminRecord>, RepositoryError>;

    async fn get_stats(&self) -> Result<DashboardStats, RepositoryError>;

    // --- Singleton documents ---
    async fn find_document(
        &self,
        kind: SingletonKind,
    ) -> Result<Option<StoredDocument>, RepositoryError>;
    /// Stores `body` only if `kind` has no document yet, then returns whichever
    /// document is stored. Concurrent callers all observe the same document.
    async fn insert_document_if_absent(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError>;
    /// Inserts or overwrites the document of `kind`.
    async fn replace_document(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

const SERVICE_COLUMNS: &str = "id, name, description, price, images, details, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, full_name, email, phone, address, service_id, service_name, notes, status, created_at, updated_at";
const PORTFOLIO_COLUMNS: &str =
    "id, image_url, title, description, sort_order, created_at, updated_at";
const ADMIN_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const DOCUMENT_COLUMNS: &str = "id, body, created_at, updated_at";

/// PostgresRepository
///
/// [`Repository`] backed by Postgres through a lazily connecting pool: the first
/// query opens the connection and later requests reuse it.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Builds the pool without touching the network.
    pub fn connect_lazy(db_url: &str) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new().max_connections(5).connect_lazy(db_url)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `./migrations`.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_services(&self) -> Result<Vec<Service>, RepositoryError> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Service>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, RepositoryError> {
        let query = format!("SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1");
        Ok(sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_service(&self, req: CreateServiceRequest) -> Result<Service, RepositoryError> {
        let query = format!(
            "INSERT INTO services (id, name, description, price, images, details, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) RETURNING {SERVICE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Service>(&query)
            .bind(Uuid::new_v4())
            .bind(req.name)
            .bind(req.description)
            .bind(req.price.unwrap_or_default())
            .bind(req.images)
            .bind(req.details)
            .fetch_one(&self.pool)
            .await?)
    }

    /// Uses `COALESCE` so only the provided fields are overwritten.
    async fn update_service(
        &self,
        id: Uuid,
        req: UpdateServiceRequest,
    ) -> Result<Option<Service>, RepositoryError> {
        let query = format!(
            "UPDATE services \
             SET name = COALESCE($2, name), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 images = COALESCE($5, images), \
                 details = COALESCE($6, details), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Service>(&query)
            .bind(id)
            .bind(req.name)
            .bind(req.description)
            .bind(req.price)
            .bind(req.images)
            .bind(req.details)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Order>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        Ok(sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepositoryError> {
        let query = format!(
            "INSERT INTO orders (id, full_name, email, phone, address, service_id, service_name, notes, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW()) RETURNING {ORDER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Order>(&query)
            .bind(Uuid::new_v4())
            .bind(req.full_name)
            .bind(req.email)
            .bind(req.phone)
            .bind(req.address)
            .bind(req.service_id)
            .bind(req.service_name)
            .bind(req.notes.unwrap_or_default())
            .bind(req.status.unwrap_or_default().as_str())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_order(
        &self,
        id: Uuid,
        req: UpdateOrderRequest,
    ) -> Result<Option<Order>, RepositoryError> {
        let query = format!(
            "UPDATE orders \
             SET status = COALESCE($2, status), \
                 notes = COALESCE($3, notes), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(req.status.as_ref().map(OrderStatus::as_str))
            .bind(req.notes)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_portfolio(&self) -> Result<Vec<PortfolioImage>, RepositoryError> {
        let query = format!(
            "SELECT {PORTFOLIO_COLUMNS} FROM portfolio_images ORDER BY sort_order ASC, created_at DESC"
        );
        Ok(sqlx::query_as::<_, PortfolioImage>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_portfolio_image(
        &self,
        req: CreatePortfolioRequest,
    ) -> Result<PortfolioImage, RepositoryError> {
        let query = format!(
            "INSERT INTO portfolio_images (id, image_url, title, description, sort_order, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {PORTFOLIO_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, PortfolioImage>(&query)
            .bind(Uuid::new_v4())
            .bind(req.image_url)
            .bind(req.title.unwrap_or_default())
            .bind(req.description.unwrap_or_default())
            .bind(req.order.unwrap_or_default())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_portfolio_image(
        &self,
        id: Uuid,
        req: UpdatePortfolioRequest,
    ) -> Result<Option<PortfolioImage>, RepositoryError> {
        let query = format!(
            "UPDATE portfolio_images \
             SET image_url = COALESCE($2, image_url), \
                 title = COALESCE($3, title), \
                 description = COALESCE($4, description), \
                 sort_order = COALESCE($5, sort_order), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {PORTFOLIO_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, PortfolioImage>(&query)
            .bind(id)
            .bind(req.image_url)
            .bind(req.title)
            .bind(req.description)
            .bind(req.order)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_portfolio_image(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM portfolio_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_admins(&self) -> Result<i64, RepositoryError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await?)
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminRecord>, RepositoryError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1");
        Ok(sqlx::query_as::<_, AdminRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_admin_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins WHERE email = $1");
        Ok(sqlx::query_as::<_, AdminRecord>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminRecord, RepositoryError> {
        let query = format!(
            "INSERT INTO admins (id, username, email, password_hash, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {ADMIN_COLUMNS}"
        );
        sqlx::query_as::<_, AdminRecord>(&query)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "Admin already exists"))
    }

    /// The table lock conflicts with itself, so two first registrations cannot both
    /// see an empty table.
    async fn create_first_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE admins IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO admins (id, username, email, password_hash, created_at, updated_at) \
             SELECT $1, $2, $3, $4, NOW(), NOW() WHERE NOT EXISTS (SELECT 1 FROM admins) \
             RETURNING {ADMIN_COLUMNS}"
        );
        let admin = sqlx::query_as::<_, AdminRecord>(&query)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, "Admin already exists"))?;

        tx.commit().await?;
        Ok(admin)
    }

    async fn list_admins(&self) -> Result<Vec<AdminRecord>, RepositoryError> {
        let query = format!("SELECT {ADMIN_COLUMNS} FROM admins ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, AdminRecord>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    /// Compiles the dashboard counters in a single round trip.
    async fn get_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let (total_services, total_orders, pending_orders) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                "SELECT \
                    (SELECT COUNT(*) FROM services), \
                    (SELECT COUNT(*) FROM orders), \
                    (SELECT COUNT(*) FROM orders WHERE status = 'pending')",
            )
            .fetch_one(&self.pool)
            .await?;
        Ok(DashboardStats {
            total_services,
            total_orders,
            pending_orders,
        })
    }

    async fn find_document(
        &self,
        kind: SingletonKind,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM site_documents WHERE kind = $1");
        Ok(sqlx::query_as::<_, StoredDocument>(&query)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await?)
    }

    /// `ON CONFLICT (kind) DO NOTHING` makes the seed atomic; the follow-up read
    /// returns the winner whether or not this call inserted it.
    async fn insert_document_if_absent(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError> {
        let inserted = sqlx::query(
            "INSERT INTO site_documents (id, kind, body, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) ON CONFLICT (kind) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(kind.as_str())
        .bind(Json(body))
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            tracing::info!(kind = kind.as_str(), "seeded default document");
        }

        let query = format!("SELECT {DOCUMENT_COLUMNS} FROM site_documents WHERE kind = $1");
        Ok(sqlx::query_as::<_, StoredDocument>(&query)
            .bind(kind.as_str())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn replace_document(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError> {
        let query = format!(
            "INSERT INTO site_documents (id, kind, body, created_at, updated_at) \
             VALUES ($1, $2, $3, NOW(), NOW()) \
             ON CONFLICT (kind) DO UPDATE SET body = EXCLUDED.body, updated_at = NOW() \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, StoredDocument>(&query)
            .bind(Uuid::new_v4())
            .bind(kind.as_str())
            .bind(Json(body))
            .fetch_one(&self.pool)
            .await?)
    }
}
