use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::storefront::SiteContext;
use super::validation::{JsonBody, validate_id, validate_limit};
use super::{ApiError, ApiResponse, AppState, ReviewDto};
use crate::constants::limits::MAX_FEATURED_REVIEWS;
use crate::services::analytics::RatingSummary;
use crate::services::{ReviewDraft, ReviewError};

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

/// Public review form. Visitors cannot pre-approve their own review.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub customer_name: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
    pub product_id: Option<i32>,
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::NotFound(id) => Self::not_found("Review", id),
            ReviewError::Validation(msg) => Self::validation(msg),
            ReviewError::Moderation(e) => Self::Conflict(e.to_string()),
            err @ ReviewError::Contended(_) => Self::Conflict(err.to_string()),
            ReviewError::Upload(e) => e.into(),
            ReviewError::Database(msg) => Self::DatabaseError(msg),
            ReviewError::Internal(msg) => Self::internal(msg),
        }
    }
}

fn reviews_enabled(site: &SiteContext) -> Result<(), ApiError> {
    if site.settings.show_reviews {
        Ok(())
    } else {
        Err(ApiError::NotFound("Reviews are disabled".to_string()))
    }
}

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    reviews_enabled(&site)?;

    let reviews = state
        .review_service()
        .list_public()
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/featured?limit=
pub async fn list_featured(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    reviews_enabled(&site)?;

    let limit = query
        .limit
        .map(|l| validate_limit(l, MAX_FEATURED_REVIEWS))
        .transpose()?;

    let reviews = state
        .review_service()
        .list_featured(limit)
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/product/{product_id}?limit=
///
/// Unknown or hidden products are a 404, not an empty list.
pub async fn list_product_reviews(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    Path(product_id): Path<i32>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<ReviewDto>>>, ApiError> {
    reviews_enabled(&site)?;

    let product_id = validate_id("product", product_id)?;
    let limit = query
        .limit
        .map(|l| validate_limit(l, MAX_FEATURED_REVIEWS))
        .transpose()?;

    state.catalog_service().get_active(product_id).await?;

    let reviews = state
        .review_service()
        .list_for_product(product_id, limit)
        .await?
        .into_iter()
        .map(ReviewDto::from)
        .collect();

    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/stats
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
) -> Result<Json<ApiResponse<RatingSummary>>, ApiError> {
    reviews_enabled(&site)?;

    let stats = state.review_service().stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// POST /reviews
///
/// The review is stored pending and stays hidden until approved.
pub async fn submit_review(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    JsonBody(payload): JsonBody<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    reviews_enabled(&site)?;

    let review = state
        .review_service()
        .submit(ReviewDraft {
            customer_name: payload.customer_name,
            comment: payload.comment,
            rating: payload.rating,
            product_id: payload.product_id,
            is_approved: false,
        })
        .await?;

    tracing::info!(review_id = review.id, "Review submitted for moderation");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewDto::from(review))),
    ))
}
