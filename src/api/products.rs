use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::storefront::SiteContext;
use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, ProductDto};
use crate::constants::limits::PRODUCT_PAGE_SIZE;
use crate::db::ProductFilter;
use crate::services::CatalogError;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    PRODUCT_PAGE_SIZE
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductDto>,
    pub pagination: Pagination,
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::not_found("Product", id),
            CatalogError::Validation(msg) => Self::validation(msg),
            CatalogError::Upload(e) => e.into(),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// GET /products?category=&search=&featured=&page=&limit=
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ApiResponse<ProductListResponse>>, ApiError> {
    let filter = ProductFilter {
        category: query.category,
        search: query.search,
        featured_only: query.featured,
    };

    let page = state
        .catalog_service()
        .list_active(filter, query.page, query.limit)
        .await?;

    let products = page
        .products
        .into_iter()
        .map(|p| ProductDto::from(p).with_order_link(&site.whatsapp_number))
        .collect();

    Ok(Json(ApiResponse::success(ProductListResponse {
        products,
        pagination: Pagination {
            page: query.page,
            limit: query.limit,
            total: page.total,
            pages: page.total.div_ceil(query.limit),
        },
    })))
}

/// GET /products/categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let categories = state.catalog_service().categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ProductDto>>, ApiError> {
    let id = validate_id("product", id)?;
    let product = state.catalog_service().get_active(id).await?;

    Ok(Json(ApiResponse::success(
        ProductDto::from(product).with_order_link(&site.whatsapp_number),
    )))
}
