//! `SeaORM` implementation of the `SettingsService` trait.

use crate::constants::limits::{
    EMAIL_MAX_LEN, NAME_MAX_LEN, PHONE_MAX_LEN, URL_MAX_LEN,
};
use crate::db::{ImageSlot, SettingsChanges, Store};
use crate::domain::{HexColor, ThemeStyle, validate};
use crate::entities::site_settings;
use crate::services::settings_service::{SettingsError, SettingsService, SettingsUpdate};
use crate::services::uploads::{ImageUpload, UploadStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct SeaOrmSettingsService {
    store: Store,
    uploads: Arc<UploadStore>,
}

fn color(field: &str, value: Option<String>) -> Result<Option<String>, SettingsError> {
    value
        .map(|v| {
            v.parse::<HexColor>()
                .map(HexColor::into_inner)
                .map_err(|e| SettingsError::Validation(format!("{field}: {e}")))
        })
        .transpose()
}

fn text(field: &str, value: Option<String>, max: usize) -> Result<Option<String>, SettingsError> {
    value
        .map(|v| validate::required_text(field, &v, max))
        .transpose()
        .map_err(SettingsError::Validation)
}

fn nullable(
    value: Option<String>,
    check: impl FnOnce(&str) -> Result<Option<String>, String>,
) -> Result<Option<Option<String>>, SettingsError> {
    value
        .map(|v| check(&v))
        .transpose()
        .map_err(SettingsError::Validation)
}

/// Checks every submitted field and converts the form into column changes.
///
/// Returns the first failure; nothing is written in that case.
pub fn validate_update(update: SettingsUpdate) -> Result<SettingsChanges, SettingsError> {
    let theme_style = update
        .theme_style
        .map(|t| {
            t.parse::<ThemeStyle>()
                .map(|style| style.as_str().to_string())
                .map_err(|e| SettingsError::Validation(e.to_string()))
        })
        .transpose()?;

    Ok(SettingsChanges {
        site_name: text("Site name", update.site_name, NAME_MAX_LEN)?,
        site_description: text("Site description", update.site_description, usize::MAX)?,
        background_color: color("Background color", update.background_color)?,
        secondary_color: color("Secondary color", update.secondary_color)?,
        accent_color: color("Accent color", update.accent_color)?,
        theme_style,
        contact_phone: nullable(update.contact_phone, |v| {
            validate::optional_phone("Contact phone", Some(v), PHONE_MAX_LEN)
        })?,
        contact_email: nullable(update.contact_email, |v| {
            validate::optional_email(Some(v), EMAIL_MAX_LEN)
        })?,
        whatsapp_number: nullable(update.whatsapp_number, |v| {
            validate::optional_phone("WhatsApp number", Some(v), PHONE_MAX_LEN)
        })?,
        facebook_url: nullable(update.facebook_url, |v| {
            validate::optional_url("Facebook URL", Some(v), URL_MAX_LEN)
        })?,
        instagram_url: nullable(update.instagram_url, |v| {
            validate::optional_url("Instagram URL", Some(v), URL_MAX_LEN)
        })?,
        tiktok_url: nullable(update.tiktok_url, |v| {
            validate::optional_url("TikTok URL", Some(v), URL_MAX_LEN)
        })?,
        about_text: text("About text", update.about_text, usize::MAX)?,
        footer_text: text("Footer text", update.footer_text, URL_MAX_LEN)?,
        hero_title: nullable(update.hero_title, |v| {
            validate::optional_text("Hero title", Some(v), URL_MAX_LEN)
        })?,
        hero_subtitle: nullable(update.hero_subtitle, |v| {
            validate::optional_text("Hero subtitle", Some(v), usize::MAX)
        })?,
        show_reviews: update.show_reviews,
        show_custom_orders: update.show_custom_orders,
        maintenance_mode: update.maintenance_mode,
    })
}

impl SeaOrmSettingsService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadStore>) -> Self {
        Self { store, uploads }
    }
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn get(&self) -> Result<site_settings::Model, SettingsError> {
        Ok(self.store.settings().get_or_create().await?)
    }

    async fn update(&self, update: SettingsUpdate) -> Result<site_settings::Model, SettingsError> {
        let changes = validate_update(update)?;
        let settings = self.store.settings().update(changes).await?;
        info!("Site settings updated");
        Ok(settings)
    }

    async fn set_image(
        &self,
        slot: ImageSlot,
        upload: ImageUpload,
    ) -> Result<site_settings::Model, SettingsError> {
        let repo = self.store.settings();
        self.uploads
            .replace(&upload, |filename| async move {
                repo.set_image(slot, Some(filename)).await.map(Some)
            })
            .await?;

        info!("Site {} replaced", slot.label());
        self.get().await
    }

    async fn remove_image(&self, slot: ImageSlot) -> Result<site_settings::Model, SettingsError> {
        let previous = self.store.settings().set_image(slot, None).await?;
        self.uploads.delete_if_some(previous).await;
        self.get().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_normalized() {
        let changes = validate_update(SettingsUpdate {
            accent_color: Some("#10B981".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.accent_color.as_deref(), Some("#10b981"));
    }

    #[test]
    fn one_bad_field_rejects_the_whole_update() {
        let result = validate_update(SettingsUpdate {
            site_name: Some("متجر الطين".to_string()),
            background_color: Some("blue".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }

    #[test]
    fn empty_string_clears_nullable_fields() {
        let changes = validate_update(SettingsUpdate {
            whatsapp_number: Some(String::new()),
            hero_title: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.whatsapp_number, Some(None));
        assert_eq!(changes.hero_title, Some(None));
        assert_eq!(changes.contact_email, None);
    }

    #[test]
    fn theme_must_be_known() {
        assert!(
            validate_update(SettingsUpdate {
                theme_style: Some("neon".to_string()),
                ..Default::default()
            })
            .is_err()
        );

        let changes = validate_update(SettingsUpdate {
            theme_style: Some("Classic".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(changes.theme_style.as_deref(), Some("classic"));
    }

    #[test]
    fn required_text_cannot_be_blanked() {
        assert!(
            validate_update(SettingsUpdate {
                site_name: Some("  ".to_string()),
                ..Default::default()
            })
            .is_err()
        );
    }
}
