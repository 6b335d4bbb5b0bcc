use axum::extract::State;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiResult, CreatedResult, created, ok};
use crate::{
    AppState,
    error::ApiError,
    models::{CreateServiceRequest, Service, UpdateServiceRequest},
};

/// list_services
///
/// [Public Route] The full catalog, newest first.
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "services",
    responses((status = 200, description = "All services", body = [Service]))
)]
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Vec<Service>> {
    Ok(ok(state.repo.list_services().await?))
}

/// get_service
///
/// [Public Route] A single catalog entry.
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Found", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn get_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Service> {
    let service = state
        .repo
        .get_service(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;
    Ok(ok(service))
}

/// create_service
///
/// [Authenticated Route] Adds a catalog entry.
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Created", body = Service),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "No valid session")
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateServiceRequest>,
) -> CreatedResult<Service> {
    let payload = payload.validate()?;
    let service = state.repo.create_service(payload).await?;
    tracing::info!(service_id = %service.id, "service created");
    Ok(created(service))
}

/// update_service
///
/// [Authenticated Route] Overwrites only the fields present in the body.
#[utoipa::path(
    put,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Updated", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateServiceRequest>,
) -> ApiResult<Service> {
    let payload = payload.validate()?;
    let service = state
        .repo
        .update_service(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))?;
    Ok(ok(service))
}

/// delete_service
///
/// [Authenticated Route] Removes a catalog entry. Orders referencing it are untouched.
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Service not found")
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Value> {
    if !state.repo.delete_service(id).await? {
        return Err(ApiError::not_found("Service not found"));
    }
    tracing::info!(service_id = %id, "service deleted");
    Ok(ok(json!({})))
}
