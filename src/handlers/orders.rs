use axum::extract::State;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiResult, CreatedResult, created, ok};
use crate::{
    AppState,
    error::ApiError,
    models::{CreateOrderRequest, Order, UpdateOrderRequest},
};

/// list_orders
///
/// [Authenticated Route] Every order, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "orders",
    responses(
        (status = 200, description = "All orders", body = [Order]),
        (status = 401, description = "No valid session")
    )
)]
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<Order>> {
    Ok(ok(state.repo.list_orders().await?))
}

/// create_order
///
/// [Public Route] Submits the customer order form. `status` defaults to `pending`.
/// `serviceId` is stored as given and not checked against the catalog.
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order received", body = Order),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> CreatedResult<Order> {
    let payload = payload.validate()?;
    let order = state.repo.create_order(payload).await?;
    tracing::info!(order_id = %order.id, status = order.status.as_str(), "order received");
    Ok(created(order))
}

/// get_order
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Found", body = Order),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Order> {
    let order = state
        .repo
        .get_order(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    Ok(ok(order))
}

/// update_order
///
/// [Authenticated Route] Sets the status and/or notes. Any status may follow any other.
#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated", body = Order),
        (status = 400, description = "Unknown status or empty update"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateOrderRequest>,
) -> ApiResult<Order> {
    let payload = payload.validate()?;
    let order = state
        .repo
        .update_order(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    tracing::info!(order_id = %order.id, status = order.status.as_str(), "order updated");
    Ok(ok(order))
}

/// delete_order
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "orders",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Value> {
    if !state.repo.delete_order(id).await? {
        return Err(ApiError::not_found("Order not found"));
    }
    Ok(ok(json!({})))
}
