use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::read_image;
use crate::api::auth::AdminIdentity;
use crate::api::validation::{JsonBody, validate_id};
use crate::api::{ApiError, ApiResponse, AppState, MessageResponse, ProductDto};
use crate::services::ProductDraft;

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProductDto>>>, ApiError> {
    let products = state
        .catalog_service()
        .list_all()
        .await?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    Ok(Json(ApiResponse::success(products)))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().get(id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDto>>), ApiError> {
    let product = state.catalog_service().create(draft).await?;

    tracing::info!(product_id = product.id, admin = %admin.username, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(product.into())),
    ))
}

pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
    JsonBody(draft): JsonBody<ProductDraft>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().update(id, draft).await?;

    tracing::info!(product_id = id, admin = %admin.username, "Product updated");
    Ok(Json(ApiResponse::success(product.into())))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = validate_id("product", id)?;
    state.catalog_service().delete(id).await?;

    tracing::info!(product_id = id, admin = %admin.username, "Product deleted");
    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Product deleted".to_string(),
    })))
}

pub async fn toggle_active(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().toggle_active(id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

pub async fn toggle_featured(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().toggle_featured(id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let upload = read_image(multipart).await?;
    let product = state.catalog_service().set_image(id, upload).await?;
    Ok(Json(ApiResponse::success(product.into())))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().remove_image(id).await?;
    Ok(Json(ApiResponse::success(product.into())))
}
