//! Domain service for the product catalog.
//!
//! Public reads only ever see active products; the admin side sees
//! everything and owns the product images.

use crate::db::ProductFilter;
use crate::entities::products;
use crate::services::uploads::{ImageUpload, ReplaceError, UploadError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ReplaceError> for CatalogError {
    fn from(err: ReplaceError) -> Self {
        match err {
            ReplaceError::Upload(e) => Self::Upload(e),
            ReplaceError::Commit(e) => Self::Database(e.to_string()),
        }
    }
}

/// Product form as submitted by the admin.
///
/// On create `name` and `price` are required. On update absent fields are
/// left alone and an empty `description` or `category` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<products::Model>,
    pub total: u64,
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Active products for the home page, featured first.
    async fn home_products(&self) -> Result<Vec<products::Model>, CatalogError>;

    /// A page of active products matching `filter`. `page` is 1-based.
    ///
    /// Blank filter values are ignored, as is the "all" category label.
    async fn list_active(
        &self,
        filter: ProductFilter,
        page: u64,
        page_size: u64,
    ) -> Result<ProductPage, CatalogError>;

    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    /// Returns [`CatalogError::NotFound`] for missing or hidden products.
    async fn get_active(&self, id: i32) -> Result<products::Model, CatalogError>;

    async fn list_all(&self) -> Result<Vec<products::Model>, CatalogError>;

    async fn get(&self, id: i32) -> Result<products::Model, CatalogError>;

    async fn create(&self, draft: ProductDraft) -> Result<products::Model, CatalogError>;

    async fn update(&self, id: i32, draft: ProductDraft) -> Result<products::Model, CatalogError>;

    /// Deletes the row, then its image.
    async fn delete(&self, id: i32) -> Result<(), CatalogError>;

    async fn toggle_active(&self, id: i32) -> Result<products::Model, CatalogError>;

    async fn toggle_featured(&self, id: i32) -> Result<products::Model, CatalogError>;

    async fn set_image(
        &self,
        id: i32,
        upload: ImageUpload,
    ) -> Result<products::Model, CatalogError>;

    async fn remove_image(&self, id: i32) -> Result<products::Model, CatalogError>;
}
