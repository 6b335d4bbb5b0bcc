//! Singleton content documents. Each GET goes through the bootstrapper, so the
//! first read of an empty collection seeds its default; each PATCH merges the
//! provided top-level fields into the stored document.

use axum::extract::State;
use serde_json::Value;

use super::{ApiJson, ApiResult, ok};
use crate::{
    AppState,
    bootstrap::{apply_patch, load_or_create},
    documents::{
        About, ContactInfo, FooterSettings, NavbarSettings, ServicesPageSettings, Singleton,
        SiteSettings,
    },
};

#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    responses((status = 200, description = "Home page settings", body = SiteSettings))
)]
pub async fn get_site_settings(State(state): State<AppState>) -> ApiResult<Singleton<SiteSettings>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/settings",
    tag = "settings",
    request_body = SiteSettings,
    responses(
        (status = 200, description = "Updated", body = SiteSettings),
        (status = 400, description = "Invalid field")
    )
)]
pub async fn update_site_settings(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<SiteSettings>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}

#[utoipa::path(
    get,
    path = "/api/footer-settings",
    tag = "settings",
    responses((status = 200, description = "Footer settings", body = FooterSettings))
)]
pub async fn get_footer_settings(
    State(state): State<AppState>,
) -> ApiResult<Singleton<FooterSettings>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/footer-settings",
    tag = "settings",
    request_body = FooterSettings,
    responses((status = 200, description = "Updated", body = FooterSettings))
)]
pub async fn update_footer_settings(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<FooterSettings>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}

#[utoipa::path(
    get,
    path = "/api/navbar-settings",
    tag = "settings",
    responses((status = 200, description = "Navbar settings", body = NavbarSettings))
)]
pub async fn get_navbar_settings(
    State(state): State<AppState>,
) -> ApiResult<Singleton<NavbarSettings>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/navbar-settings",
    tag = "settings",
    request_body = NavbarSettings,
    responses((status = 200, description = "Updated", body = NavbarSettings))
)]
pub async fn update_navbar_settings(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<NavbarSettings>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}

#[utoipa::path(
    get,
    path = "/api/about",
    tag = "settings",
    responses((status = 200, description = "About page", body = About))
)]
pub async fn get_about(State(state): State<AppState>) -> ApiResult<Singleton<About>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/about",
    tag = "settings",
    request_body = About,
    responses(
        (status = 200, description = "Updated", body = About),
        (status = 400, description = "Skill level outside 0..=100")
    )
)]
pub async fn update_about(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<About>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}

#[utoipa::path(
    get,
    path = "/api/contact-info",
    tag = "settings",
    responses((status = 200, description = "Contact page", body = ContactInfo))
)]
pub async fn get_contact_info(State(state): State<AppState>) -> ApiResult<Singleton<ContactInfo>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/contact-info",
    tag = "settings",
    request_body = ContactInfo,
    responses(
        (status = 200, description = "Updated", body = ContactInfo),
        (status = 400, description = "Email, phone and location are required")
    )
)]
pub async fn update_contact_info(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<ContactInfo>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}

#[utoipa::path(
    get,
    path = "/api/services-page-settings",
    tag = "settings",
    responses((status = 200, description = "Services page header", body = ServicesPageSettings))
)]
pub async fn get_services_page_settings(
    State(state): State<AppState>,
) -> ApiResult<Singleton<ServicesPageSettings>> {
    Ok(ok(load_or_create(state.repo.as_ref()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/services-page-settings",
    tag = "settings",
    request_body = ServicesPageSettings,
    responses((status = 200, description = "Updated", body = ServicesPageSettings))
)]
pub async fn update_services_page_settings(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Singleton<ServicesPageSettings>> {
    Ok(ok(apply_patch(state.repo.as_ref(), patch).await?))
}
