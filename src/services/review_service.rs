//! Domain service for customer reviews and their moderation.
//!
//! Publicly submitted reviews start pending. Only approved reviews are ever
//! listed publicly, and only approved reviews can be featured.

use crate::domain::ModerationError;
use crate::entities::reviews;
use crate::services::analytics::RatingSummary;
use crate::services::uploads::{ImageUpload, ReplaceError, UploadError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review {0} not found")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Moderation(#[from] ModerationError),

    #[error("Review {0} is being moderated by another request")]
    Contended(i32),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for ReviewError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ReviewError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ReplaceError> for ReviewError {
    fn from(err: ReplaceError) -> Self {
        match err {
            ReplaceError::Upload(e) => Self::Upload(e),
            ReplaceError::Commit(e) => Self::Database(e.to_string()),
        }
    }
}

/// Review form. `rating` defaults to five stars when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewDraft {
    pub customer_name: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
    pub product_id: Option<i32>,
    /// Admin-created reviews may skip moderation.
    #[serde(default)]
    pub is_approved: bool,
}

/// Partial admin edit. `product_id: Some(None)` detaches the product.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewEdit {
    pub customer_name: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
    #[serde(default, with = "double_option")]
    pub product_id: Option<Option<i32>>,
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    Approve,
    Reject,
    Delete,
}

#[async_trait::async_trait]
pub trait ReviewService: Send + Sync {
    /// Approved reviews, newest first.
    async fn list_public(&self) -> Result<Vec<reviews::Model>, ReviewError>;

    async fn list_featured(&self, limit: Option<u64>) -> Result<Vec<reviews::Model>, ReviewError>;

    /// Approved reviews of one product, newest first.
    async fn list_for_product(
        &self,
        product_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<reviews::Model>, ReviewError>;

    async fn stats(&self) -> Result<RatingSummary, ReviewError>;

    /// Stores a customer submission as pending.
    async fn submit(&self, draft: ReviewDraft) -> Result<reviews::Model, ReviewError>;

    /// Admin listing; `status` is `pending`, `approved`, `featured` or `all`.
    async fn list(&self, status: Option<&str>) -> Result<Vec<reviews::Model>, ReviewError>;

    async fn get(&self, id: i32) -> Result<reviews::Model, ReviewError>;

    async fn create(&self, draft: ReviewDraft) -> Result<reviews::Model, ReviewError>;

    async fn update(&self, id: i32, edit: ReviewEdit) -> Result<reviews::Model, ReviewError>;

    async fn approve(&self, id: i32) -> Result<reviews::Model, ReviewError>;

    /// Sends the review back to pending, clearing any featured mark.
    async fn reject(&self, id: i32) -> Result<reviews::Model, ReviewError>;

    /// # Errors
    ///
    /// Returns [`ReviewError::Moderation`] if the review is still pending.
    async fn toggle_feature(&self, id: i32) -> Result<reviews::Model, ReviewError>;

    async fn delete(&self, id: i32) -> Result<(), ReviewError>;

    /// Applies one action to many reviews. Returns the number affected.
    async fn bulk(&self, action: BulkAction, ids: &[i32]) -> Result<u64, ReviewError>;

    async fn set_image(&self, id: i32, upload: ImageUpload) -> Result<reviews::Model, ReviewError>;

    async fn remove_image(&self, id: i32) -> Result<reviews::Model, ReviewError>;
}
