//! Domain service for the site-wide settings singleton.

use crate::db::ImageSlot;
use crate::entities::site_settings;
use crate::services::uploads::{ImageUpload, ReplaceError, UploadError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SettingsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ReplaceError> for SettingsError {
    fn from(err: ReplaceError) -> Self {
        match err {
            ReplaceError::Upload(e) => Self::Upload(e),
            ReplaceError::Commit(e) => Self::Database(e.to_string()),
        }
    }
}

/// Settings form. Absent fields are untouched; for nullable fields an empty
/// string clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub background_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub theme_style: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub whatsapp_number: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub about_text: Option<String>,
    pub footer_text: Option<String>,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub show_reviews: Option<bool>,
    pub show_custom_orders: Option<bool>,
    pub maintenance_mode: Option<bool>,
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    /// Returns the settings row, creating it with defaults on first access.
    async fn get(&self) -> Result<site_settings::Model, SettingsError>;

    /// Validates every field first; any failure leaves the row untouched.
    async fn update(&self, update: SettingsUpdate) -> Result<site_settings::Model, SettingsError>;

    async fn set_image(
        &self,
        slot: ImageSlot,
        upload: ImageUpload,
    ) -> Result<site_settings::Model, SettingsError>;

    async fn remove_image(&self, slot: ImageSlot) -> Result<site_settings::Model, SettingsError>;
}
