use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::read_image;
use crate::api::auth::AdminIdentity;
use crate::api::validation::{JsonBody, validate_id};
use crate::api::{
    ApiError, ApiResponse, AppState, DisplayOrderRequest, MessageResponse, TestimonialDto,
};
use crate::services::TestimonialDraft;

pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TestimonialDto>>>, ApiError> {
    let testimonials = state
        .testimonial_service()
        .list_all()
        .await?
        .into_iter()
        .map(TestimonialDto::from)
        .collect();

    Ok(Json(ApiResponse::success(testimonials)))
}

pub async fn get_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state.testimonial_service().get(id).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

pub async fn create_testimonial(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(draft): JsonBody<TestimonialDraft>,
) -> Result<(StatusCode, Json<ApiResponse<TestimonialDto>>), ApiError> {
    let testimonial = state.testimonial_service().create(draft).await?;

    tracing::info!(
        testimonial_id = testimonial.id,
        admin = %admin.username,
        "Testimonial created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(testimonial.into())),
    ))
}

pub async fn update_testimonial(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(draft): JsonBody<TestimonialDraft>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state.testimonial_service().update(id, draft).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

pub async fn delete_testimonial(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    state.testimonial_service().delete(id).await?;

    tracing::info!(testimonial_id = id, admin = %admin.username, "Testimonial deleted");
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Testimonial deleted".to_string(),
    })))
}

pub async fn toggle_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state.testimonial_service().toggle_active(id).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

pub async fn toggle_featured(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state.testimonial_service().toggle_featured(id).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

/// PUT /admin/testimonials/{id}/order
pub async fn set_display_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(payload): JsonBody<DisplayOrderRequest>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state
        .testimonial_service()
        .set_display_order(id, payload.display_order)
        .await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let upload = read_image(multipart).await?;
    let testimonial = state.testimonial_service().set_image(id, upload).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TestimonialDto>>, ApiError> {
    let id = validate_id("testimonial", id)?;
    let testimonial = state.testimonial_service().remove_image(id).await?;
    Ok(Json(ApiResponse::success(testimonial.into())))
}
