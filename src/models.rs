use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;

// --- Core Application Schemas (Mapped to Database) ---

/// Service
///
/// A bookable entry of the services catalog (`services` table).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub images: Vec<String>,
    pub details: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// OrderStatus
///
/// Lifecycle of a customer order. Any status may follow any other; the admin UI
/// only drives pending -> completed and pending -> cancelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, ToSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Raised when a stored or submitted status is not one of the four known values.
#[derive(Debug, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl TryFrom<String> for OrderStatus {
    type Error = UnknownOrderStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(UnknownOrderStatus(value)),
        }
    }
}

/// Order
///
/// A customer service request (`orders` table). `service_id` is a plain string
/// reference and is never checked against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service_id: String,
    pub service_name: String,
    pub notes: String,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// PortfolioImage
///
/// One gallery entry (`portfolio_images` table). Listed by `order` ascending.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PortfolioImage {
    pub id: Uuid,
    pub image_url: String,
    pub title: String,
    pub description: String,
    /// `order` is a reserved word in SQL, so the column is `sort_order`.
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// AdminRecord
///
/// Raw `admins` row including the password hash. Internal only: never serialized.
#[derive(Debug, Clone, FromRow, Default)]
pub struct AdminRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// AdminProfile
///
/// Public view of an admin account, safe to return over the API.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl From<AdminRecord> for AdminProfile {
    fn from(record: AdminRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// AdminSummary
///
/// Identity returned by login, session lookup and registration.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[ts(export)]
pub struct AdminSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<AdminRecord> for AdminSummary {
    fn from(record: AdminRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

// --- Request Payloads (Input Schemas) ---

fn require(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(message));
    }
    Ok(())
}

/// CreateServiceRequest
///
/// Input payload for POST /api/services.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub images: Vec<String>,
    pub details: String,
}

impl CreateServiceRequest {
    /// Checks required fields and trims the name.
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.name = self.name.trim().to_string();
        require(&self.name, "Service name is required")?;
        require(&self.description, "Description is required")?;
        require(&self.details, "Details are required")?;
        match self.price {
            None => return Err(ApiError::bad_request("Price is required")),
            Some(price) => validate_price(price)?,
        }
        Ok(self)
    }
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::bad_request("Price must be a non-negative number"));
    }
    Ok(())
}

/// UpdateServiceRequest
///
/// Partial update payload for PUT /api/services/{id}. Only provided fields change.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl UpdateServiceRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        if let Some(name) = self.name.take() {
            let name = name.trim().to_string();
            require(&name, "Service name is required")?;
            self.name = Some(name);
        }
        if let Some(description) = &self.description {
            require(description, "Description is required")?;
        }
        if let Some(details) = &self.details {
            require(details, "Details are required")?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(self)
    }
}

/// CreateOrderRequest
///
/// Input payload for the public order form (POST /api/orders).
/// `status` is optional and defaults to `pending`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CreateOrderRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub service_id: String,
    pub service_name: String,
    pub notes: Option<String>,
    pub status: Option<OrderStatus>,
}

impl CreateOrderRequest {
    /// Checks required fields and normalizes name, phone and email.
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.full_name = self.full_name.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        self.phone = self.phone.trim().to_string();
        require(&self.full_name, "Full name is required")?;
        require(&self.email, "Email is required")?;
        require(&self.phone, "Phone number is required")?;
        require(&self.address, "Address is required")?;
        require(&self.service_id, "Service ID is required")?;
        require(&self.service_name, "Service name is required")?;
        Ok(self)
    }
}

/// UpdateOrderRequest
///
/// Admin payload for PATCH /api/orders/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateOrderRequest {
    pub fn validate(self) -> Result<Self, ApiError> {
        if self.status.is_none() && self.notes.is_none() {
            return Err(ApiError::bad_request("Nothing to update"));
        }
        Ok(self)
    }
}

/// CreatePortfolioRequest
///
/// Input payload for POST /api/portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct CreatePortfolioRequest {
    pub image_url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
}

impl CreatePortfolioRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.image_url = self.image_url.trim().to_string();
        require(&self.image_url, "Image URL is required")?;
        self.title = self.title.map(|t| t.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        Ok(self)
    }
}

/// UpdatePortfolioRequest
///
/// Partial update payload for PATCH /api/portfolio/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePortfolioRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

impl UpdatePortfolioRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        if let Some(url) = self.image_url.take() {
            let url = url.trim().to_string();
            require(&url, "Image URL is required")?;
            self.image_url = Some(url);
        }
        self.title = self.title.map(|t| t.trim().to_string());
        self.description = self.description.map(|d| d.trim().to_string());
        Ok(self)
    }
}

/// LoginRequest
///
/// Credentials for POST /api/auth/login. The password is only compared against
/// the stored hash and never logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// RegisterAdminRequest
///
/// Input payload for POST /api/admin/register.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(default)]
#[ts(export)]
pub struct RegisterAdminRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterAdminRequest {
    pub fn validate(mut self) -> Result<Self, ApiError> {
        self.username = self.username.trim().to_string();
        self.email = self.email.trim().to_lowercase();
        require(&self.username, "Username is required")?;
        require(&self.email, "Email is required")?;
        require(&self.password, "Password is required")?;
        Ok(self)
    }
}

// --- Dashboard Schemas (Output) ---

/// DashboardStats
///
/// Output schema for GET /api/admin/stats.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_services: i64,
    pub total_orders: i64,
    /// Orders still in the `pending` status.
    pub pending_orders: i64,
}
