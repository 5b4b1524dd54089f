//! Back-office endpoints under `/api/admin`.
//!
//! Every route here requires a logged-in admin; [`auth_middleware`] turns the
//! session into an [`AdminIdentity`](super::auth::AdminIdentity) extension.

use axum::{
    Json, Router,
    extract::{Multipart, State},
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use super::auth::auth_middleware;
use super::observability::get_metrics;
use super::{ApiError, ApiResponse, AppState, DashboardDto, ProductDto, ReviewDto};
use crate::services::{AnalyticsSnapshot, ImageUpload};

mod products;
mod reviews;
mod settings;
mod testimonials;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/analytics", get(get_analytics))
        .route("/metrics", get(get_metrics))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route(
            "/products/{id}/toggle-active",
            post(products::toggle_active),
        )
        .route(
            "/products/{id}/toggle-featured",
            post(products::toggle_featured),
        )
        .route(
            "/products/{id}/image",
            put(products::upload_image).delete(products::delete_image),
        )
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route("/reviews/bulk", post(reviews::bulk_action))
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/reviews/{id}/approve", post(reviews::approve_review))
        .route("/reviews/{id}/reject", post(reviews::reject_review))
        .route(
            "/reviews/{id}/toggle-featured",
            post(reviews::toggle_featured),
        )
        .route(
            "/reviews/{id}/image",
            put(reviews::upload_image).delete(reviews::delete_image),
        )
        .route(
            "/testimonials",
            get(testimonials::list_testimonials).post(testimonials::create_testimonial),
        )
        .route(
            "/testimonials/{id}",
            get(testimonials::get_testimonial)
                .put(testimonials::update_testimonial)
                .delete(testimonials::delete_testimonial),
        )
        .route(
            "/testimonials/{id}/toggle-active",
            post(testimonials::toggle_active),
        )
        .route(
            "/testimonials/{id}/toggle-featured",
            post(testimonials::toggle_featured),
        )
        .route(
            "/testimonials/{id}/order",
            put(testimonials::set_display_order),
        )
        .route(
            "/testimonials/{id}/image",
            put(testimonials::upload_image).delete(testimonials::delete_image),
        )
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/settings/logo",
            put(settings::upload_logo).delete(settings::delete_logo),
        )
        .route(
            "/settings/hero-image",
            put(settings::upload_hero_image).delete(settings::delete_hero_image),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// GET /admin/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let dashboard = state.analytics().dashboard().await?;

    Ok(Json(ApiResponse::success(DashboardDto {
        total_products: dashboard.total_products,
        approved_reviews: dashboard.approved_reviews,
        pending_reviews: dashboard.pending_reviews,
        recent_products: dashboard
            .recent_products
            .into_iter()
            .map(ProductDto::from)
            .collect(),
        recent_reviews: dashboard
            .recent_reviews
            .into_iter()
            .map(ReviewDto::from)
            .collect(),
    })))
}

/// GET /admin/analytics
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AnalyticsSnapshot>>, ApiError> {
    let snapshot = state.analytics().snapshot().await?;
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Pulls the `image` file out of a multipart form.
async fn read_image(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::validation("No file selected"))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Invalid upload: {e}")))?;

        return Ok(ImageUpload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::validation("No image file provided"))
}
