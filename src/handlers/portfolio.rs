use axum::extract::State;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{ApiJson, ApiPath, ApiResult, CreatedResult, created, ok};
use crate::{
    AppState,
    error::ApiError,
    models::{CreatePortfolioRequest, PortfolioImage, UpdatePortfolioRequest},
};

/// list_portfolio
///
/// [Public Route] Gallery entries by `order` ascending, newest first within a tie.
#[utoipa::path(
    get,
    path = "/api/portfolio",
    tag = "portfolio",
    responses((status = 200, description = "Gallery", body = [PortfolioImage]))
)]
pub async fn list_portfolio(State(state): State<AppState>) -> ApiResult<Vec<PortfolioImage>> {
    Ok(ok(state.repo.list_portfolio().await?))
}

#[utoipa::path(
    post,
    path = "/api/portfolio",
    tag = "portfolio",
    request_body = CreatePortfolioRequest,
    responses(
        (status = 201, description = "Created", body = PortfolioImage),
        (status = 400, description = "Image URL is required")
    )
)]
pub async fn create_portfolio_image(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreatePortfolioRequest>,
) -> CreatedResult<PortfolioImage> {
    let payload = payload.validate()?;
    Ok(created(state.repo.create_portfolio_image(payload).await?))
}

#[utoipa::path(
    patch,
    path = "/api/portfolio/{id}",
    tag = "portfolio",
    params(("id" = Uuid, Path, description = "Portfolio image ID")),
    request_body = UpdatePortfolioRequest,
    responses(
        (status = 200, description = "Updated", body = PortfolioImage),
        (status = 404, description = "Portfolio image not found")
    )
)]
pub async fn update_portfolio_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdatePortfolioRequest>,
) -> ApiResult<PortfolioImage> {
    let payload = payload.validate()?;
    let image = state
        .repo
        .update_portfolio_image(id, payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Portfolio image not found"))?;
    Ok(ok(image))
}

#[utoipa::path(
    delete,
    path = "/api/portfolio/{id}",
    tag = "portfolio",
    params(("id" = Uuid, Path, description = "Portfolio image ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Portfolio image not found")
    )
)]
pub async fn delete_portfolio_image(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Value> {
    if !state.repo.delete_portfolio_image(id).await? {
        return Err(ApiError::not_found("Portfolio image not found"));
    }
    Ok(ok(json!({})))
}
