use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TestimonialDto};
use crate::services::TestimonialError;

#[derive(Debug, Deserialize)]
pub struct TestimonialQuery {
    #[serde(default)]
    pub featured: bool,
}

impl From<TestimonialError> for ApiError {
    fn from(err: TestimonialError) -> Self {
        match err {
            TestimonialError::NotFound(id) => Self::not_found("Testimonial", id),
            TestimonialError::Validation(msg) => Self::validation(msg),
            TestimonialError::Upload(e) => e.into(),
            TestimonialError::Database(msg) => Self::DatabaseError(msg),
            TestimonialError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /testimonials?featured=
pub async fn list_testimonials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TestimonialQuery>,
) -> Result<Json<ApiResponse<Vec<TestimonialDto>>>, ApiError> {
    let testimonials = state
        .testimonial_service()
        .list_public(query.featured)
        .await?
        .into_iter()
        .map(TestimonialDto::from)
        .collect();

    Ok(Json(ApiResponse::success(testimonials)))
}
