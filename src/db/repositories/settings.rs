use crate::constants::settings_defaults;
use crate::entities::{
    prelude::*,
    site_settings::{self, SINGLETON_ID},
};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set,
    TransactionTrait, sea_query::OnConflict,
};
use tracing::{debug, info};

/// Which settings image column an upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Logo,
    HeroImage,
}

impl ImageSlot {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::HeroImage => "hero image",
        }
    }
}

/// Already-validated partial update. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct SettingsChanges {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub background_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub theme_style: Option<String>,
    pub contact_phone: Option<Option<String>>,
    pub contact_email: Option<Option<String>>,
    pub whatsapp_number: Option<Option<String>>,
    pub facebook_url: Option<Option<String>>,
    pub instagram_url: Option<Option<String>>,
    pub tiktok_url: Option<Option<String>>,
    pub about_text: Option<String>,
    pub footer_text: Option<String>,
    pub hero_title: Option<Option<String>>,
    pub hero_subtitle: Option<Option<String>>,
    pub show_reviews: Option<bool>,
    pub show_custom_orders: Option<bool>,
    pub maintenance_mode: Option<bool>,
}

fn default_row() -> site_settings::ActiveModel {
    site_settings::ActiveModel {
        id: Set(SINGLETON_ID),
        site_name: Set(settings_defaults::SITE_NAME.to_string()),
        site_description: Set(settings_defaults::SITE_DESCRIPTION.to_string()),
        logo_filename: Set(None),
        hero_image_filename: Set(None),
        background_color: Set(settings_defaults::BACKGROUND_COLOR.to_string()),
        secondary_color: Set(settings_defaults::SECONDARY_COLOR.to_string()),
        accent_color: Set(settings_defaults::ACCENT_COLOR.to_string()),
        theme_style: Set(settings_defaults::THEME_STYLE.to_string()),
        contact_phone: Set(None),
        contact_email: Set(None),
        whatsapp_number: Set(None),
        facebook_url: Set(None),
        instagram_url: Set(None),
        tiktok_url: Set(None),
        about_text: Set(settings_defaults::ABOUT_TEXT.to_string()),
        footer_text: Set(settings_defaults::FOOTER_TEXT.to_string()),
        hero_title: Set(None),
        hero_subtitle: Set(None),
        show_reviews: Set(true),
        show_custom_orders: Set(true),
        maintenance_mode: Set(false),
        updated_at: Set(crate::db::now_timestamp()),
    }
}

/// Inserts the default row unless one already exists.
///
/// The fixed primary key makes concurrent callers race on the constraint
/// rather than on a read, so at most one row is ever created.
async fn ensure_row<C: ConnectionTrait>(conn: &C) -> Result<()> {
    let inserted = SiteSettings::insert(default_row())
        .on_conflict(
            OnConflict::column(site_settings::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .context("Failed to seed site settings")?;

    if inserted > 0 {
        info!("Created default site settings");
    }
    Ok(())
}

async fn load<C: ConnectionTrait>(conn: &C) -> Result<site_settings::Model> {
    SiteSettings::find_by_id(SINGLETON_ID)
        .one(conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Site settings row missing after seeding"))
}

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_or_create(&self) -> Result<site_settings::Model> {
        if let Some(settings) = SiteSettings::find_by_id(SINGLETON_ID).one(&self.conn).await? {
            return Ok(settings);
        }

        ensure_row(&self.conn).await?;
        load(&self.conn).await
    }

    /// Applies every change in one transaction and refreshes `updated_at`.
    pub async fn update(&self, changes: SettingsChanges) -> Result<site_settings::Model> {
        let txn = self.conn.begin().await?;

        ensure_row(&txn).await?;
        let current = load(&txn).await?;

        let mut active: site_settings::ActiveModel = current.into();
        if let Some(v) = changes.site_name {
            active.site_name = Set(v);
        }
        if let Some(v) = changes.site_description {
            active.site_description = Set(v);
        }
        if let Some(v) = changes.background_color {
            active.background_color = Set(v);
        }
        if let Some(v) = changes.secondary_color {
            active.secondary_color = Set(v);
        }
        if let Some(v) = changes.accent_color {
            active.accent_color = Set(v);
        }
        if let Some(v) = changes.theme_style {
            active.theme_style = Set(v);
        }
        if let Some(v) = changes.contact_phone {
            active.contact_phone = Set(v);
        }
        if let Some(v) = changes.contact_email {
            active.contact_email = Set(v);
        }
        if let Some(v) = changes.whatsapp_number {
            active.whatsapp_number = Set(v);
        }
        if let Some(v) = changes.facebook_url {
            active.facebook_url = Set(v);
        }
        if let Some(v) = changes.instagram_url {
            active.instagram_url = Set(v);
        }
        if let Some(v) = changes.tiktok_url {
            active.tiktok_url = Set(v);
        }
        if let Some(v) = changes.about_text {
            active.about_text = Set(v);
        }
        if let Some(v) = changes.footer_text {
            active.footer_text = Set(v);
        }
        if let Some(v) = changes.hero_title {
            active.hero_title = Set(v);
        }
        if let Some(v) = changes.hero_subtitle {
            active.hero_subtitle = Set(v);
        }
        if let Some(v) = changes.show_reviews {
            active.show_reviews = Set(v);
        }
        if let Some(v) = changes.show_custom_orders {
            active.show_custom_orders = Set(v);
        }
        if let Some(v) = changes.maintenance_mode {
            active.maintenance_mode = Set(v);
        }
        active.updated_at = Set(crate::db::now_timestamp());

        let model = active.update(&txn).await?;
        txn.commit().await?;

        debug!("Site settings updated");
        Ok(model)
    }

    /// Points an image slot at a new file and returns the file it replaced.
    pub async fn set_image(
        &self,
        slot: ImageSlot,
        filename: Option<String>,
    ) -> Result<Option<String>> {
        let txn = self.conn.begin().await?;

        ensure_row(&txn).await?;
        let current = load(&txn).await?;

        let previous = match slot {
            ImageSlot::Logo => current.logo_filename.clone(),
            ImageSlot::HeroImage => current.hero_image_filename.clone(),
        };

        let mut active: site_settings::ActiveModel = current.into();
        match slot {
            ImageSlot::Logo => active.logo_filename = Set(filename),
            ImageSlot::HeroImage => active.hero_image_filename = Set(filename),
        }
        active.updated_at = Set(crate::db::now_timestamp());
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(previous)
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(SiteSettings::find().count(&self.conn).await?)
    }
}
