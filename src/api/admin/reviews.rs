use axum::{
    Extension, Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::read_image;
use crate::api::auth::AdminIdentity;
use crate::api::validation::{JsonBody, validate_id, validate_ids};
use crate::api::{
    ApiError, ApiResponse, AppState, BulkReviewRequest, CountResponse, MessageResponse, ReviewDto,
};
use crate::services::{ReviewDraft, ReviewEdit};

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub status: Option<String>,
}

/// GET /admin/reviews?status=
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    let reviews = state
        .review_service()
        .list(query.status.as_deref())
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(Json(ApiResponse::success(reviews)))
}

pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().get(id).await?;
    Ok(Json(ApiResponse::success(review.into())))
}

pub async fn create_review(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(draft): JsonBody<ReviewDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    let review = state.review_service().create(draft).await?;

    tracing::info!(review_id = review.id, admin = %admin.username, "Review created");
    Ok((StatusCode::CREATED, Json(ApiResponse::success(review.into()))))
}

pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    JsonBody(edit): JsonBody<ReviewEdit>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().update(id, edit).await?;
    Ok(Json(ApiResponse::success(review.into())))
}

pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("review", id)?;
    state.review_service().delete(id).await?;

    tracing::info!(review_id = id, admin = %admin.username, "Review deleted");
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Review deleted".to_string(),
    })))
}

pub async fn approve_review(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().approve(id).await?;

    tracing::info!(review_id = id, admin = %admin.username, "Review approved");
    Ok(Json(ApiResponse::success(review.into())))
}

pub async fn reject_review(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().reject(id).await?;

    tracing::info!(review_id = id, admin = %admin.username, "Review rejected");
    Ok(Json(ApiResponse::success(review.into())))
}

pub async fn toggle_featured(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().toggle_feature(id).await?;
    Ok(Json(ApiResponse::success(review.into())))
}

/// POST /admin/reviews/bulk
pub async fn bulk_action(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(payload): JsonBody<BulkReviewRequest>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let ids = validate_ids(&payload.ids)?;
    let affected = state.review_service().bulk(payload.action, ids).await?;

    tracing::info!(
        action = ?payload.action,
        affected,
        admin = %admin.username,
        "Bulk review moderation"
    );
    Ok(Json(ApiResponse::success(CountResponse { affected })))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let upload = read_image(multipart).await?;
    let review = state.review_service().set_image(id, upload).await?;
    Ok(Json(ApiResponse::success(review.into())))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReviewDto>>, ApiError> {
    let id = validate_id("review", id)?;
    let review = state.review_service().remove_image(id).await?;
    Ok(Json(ApiResponse::success(review.into())))
}
