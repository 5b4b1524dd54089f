//! `SeaORM` entity for the site-wide settings table.
//!
//! The table holds exactly one row whose primary key is always
//! [`SINGLETON_ID`]; creation goes through an `ON CONFLICT DO NOTHING` insert.

use sea_orm::entity::prelude::*;

pub const SINGLETON_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "site_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub site_name: String,

    #[sea_orm(column_type = "Text")]
    pub site_description: String,

    pub logo_filename: Option<String>,

    pub hero_image_filename: Option<String>,

    /// `#rrggbb`
    pub background_color: String,

    pub secondary_color: String,

    pub accent_color: String,

    /// modern, classic or minimal
    pub theme_style: String,

    pub contact_phone: Option<String>,

    pub contact_email: Option<String>,

    pub whatsapp_number: Option<String>,

    pub facebook_url: Option<String>,

    pub instagram_url: Option<String>,

    pub tiktok_url: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub about_text: String,

    #[sea_orm(column_type = "Text")]
    pub footer_text: String,

    pub hero_title: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub hero_subtitle: Option<String>,

    pub show_reviews: bool,

    pub show_custom_orders: bool,

    pub maintenance_mode: bool,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
