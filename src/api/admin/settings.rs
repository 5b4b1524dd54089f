use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use std::sync::Arc;

use super::read_image;
use crate::api::auth::AdminIdentity;
use crate::api::validation::JsonBody;
use crate::api::{ApiError, ApiResponse, AppState, SiteSettingsDto};
use crate::db::ImageSlot;
use crate::services::SettingsUpdate;

fn settings_response(
    settings: &crate::entities::site_settings::Model,
) -> Json<ApiResponse<SiteSettingsDto>> {
    Json(ApiResponse::success(SiteSettingsDto::from(settings)))
}

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let settings = state.settings_service().get().await?;
    Ok(settings_response(&settings))
}

/// PUT /admin/settings
///
/// All-or-nothing: one invalid field rejects the whole form.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(update): JsonBody<SettingsUpdate>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let settings = state.settings_service().update(update).await?;

    tracing::info!(admin = %admin.username, "Site settings updated");
    Ok(settings_response(&settings))
}

async fn upload(
    state: &AppState,
    slot: ImageSlot,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let upload = read_image(multipart).await?;
    let settings = state.settings_service().set_image(slot, upload).await?;
    Ok(settings_response(&settings))
}

async fn remove(
    state: &AppState,
    slot: ImageSlot,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    let settings = state.settings_service().remove_image(slot).await?;
    Ok(settings_response(&settings))
}

pub async fn upload_logo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    upload(&state, ImageSlot::Logo, multipart).await
}

pub async fn delete_logo(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    remove(&state, ImageSlot::Logo).await
}

pub async fn upload_hero_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    upload(&state, ImageSlot::HeroImage, multipart).await
}

pub async fn delete_hero_image(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SiteSettingsDto>>, ApiError> {
    remove(&state, ImageSlot::HeroImage).await
}
