//! Domain service for curated testimonials.

use crate::entities::testimonials;
use crate::services::uploads::{ImageUpload, ReplaceError, UploadError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TestimonialError {
    #[error("Testimonial {0} not found")]
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

impl From<sea_orm::DbErr> for TestimonialError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for TestimonialError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ReplaceError> for TestimonialError {
    fn from(err: ReplaceError) -> Self {
        match err {
            ReplaceError::Upload(e) => Self::Upload(e),
            ReplaceError::Commit(e) => Self::Database(e.to_string()),
        }
    }
}

/// Testimonial form. Absent fields keep their value on update; an empty
/// `customer_title` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialDraft {
    pub customer_name: Option<String>,
    pub customer_title: Option<String>,
    pub testimonial_text: Option<String>,
    pub rating: Option<i32>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[async_trait::async_trait]
pub trait TestimonialService: Send + Sync {
    /// Active testimonials in display order.
    async fn list_public(
        &self,
        featured_only: bool,
    ) -> Result<Vec<testimonials::Model>, TestimonialError>;

    /// Every testimonial in display order.
    async fn list_all(&self) -> Result<Vec<testimonials::Model>, TestimonialError>;

    async fn get(&self, id: i32) -> Result<testimonials::Model, TestimonialError>;

    async fn create(
        &self,
        draft: TestimonialDraft,
    ) -> Result<testimonials::Model, TestimonialError>;

    async fn update(
        &self,
        id: i32,
        draft: TestimonialDraft,
    ) -> Result<testimonials::Model, TestimonialError>;

    async fn delete(&self, id: i32) -> Result<(), TestimonialError>;

    async fn toggle_active(&self, id: i32) -> Result<testimonials::Model, TestimonialError>;

    async fn toggle_featured(&self, id: i32) -> Result<testimonials::Model, TestimonialError>;

    async fn set_display_order(
        &self,
        id: i32,
        display_order: i32,
    ) -> Result<testimonials::Model, TestimonialError>;

    async fn set_image(
        &self,
        id: i32,
        upload: ImageUpload,
    ) -> Result<testimonials::Model, TestimonialError>;

    async fn remove_image(&self, id: i32) -> Result<testimonials::Model, TestimonialError>;
}
