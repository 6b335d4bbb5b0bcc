//! HTTP handlers, grouped by resource.
//!
//! Every handler answers with the `{"success": true, "data": ...}` envelope on
//! success; failures go through [`ApiError`] and render as
//! `{"success": false, "error": "..."}`.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path},
    http::StatusCode,
};
use serde::Serialize;

use crate::error::ApiError;

pub mod admin;
pub mod orders;
pub mod portfolio;
pub mod services;
pub mod settings;

/// JSON body extractor whose rejections use the API error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path extractor whose rejections use the API error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// ApiResponse
///
/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}
