use serde::{Deserialize, Serialize};

use crate::domain::ReviewState;
use crate::entities::{products, reviews, site_settings, testimonials};
use crate::services::whatsapp::PageLinks;

/// Public URL prefix uploaded images are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

fn image_url(filename: Option<&str>) -> Option<String> {
    filename.map(|f| format!("{UPLOADS_ROUTE}/{f}"))
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub image_filename: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub is_active: bool,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

impl From<products::Model> for ProductDto {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            image_url: image_url(model.image_filename.as_deref()),
            name: model.name,
            description: model.description,
            price: model.price,
            category: model.category,
            image_filename: model.image_filename,
            created_at: model.created_at,
            is_active: model.is_active,
            featured: model.featured,
            whatsapp_url: None,
        }
    }
}

impl ProductDto {
    /// Attaches the order link shown on public product cards.
    #[must_use]
    pub fn with_order_link(mut self, number: &str) -> Self {
        self.whatsapp_url = Some(crate::services::whatsapp::build(
            number,
            Some(&self.name),
            None,
        ));
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewDto {
    pub id: i32,
    pub customer_name: String,
    pub comment: String,
    pub rating: i32,
    pub image_filename: Option<String>,
    pub image_url: Option<String>,
    pub product_id: Option<i32>,
    pub created_at: String,
    pub status: ReviewState,
    pub is_approved: bool,
    pub is_featured: bool,
}

impl From<reviews::Model> for ReviewDto {
    fn from(model: reviews::Model) -> Self {
        let status = ReviewState::from_flags(model.is_approved, model.is_featured);
        Self {
            id: model.id,
            image_url: image_url(model.image_filename.as_deref()),
            customer_name: model.customer_name,
            comment: model.comment,
            rating: model.rating,
            image_filename: model.image_filename,
            product_id: model.product_id,
            created_at: model.created_at,
            status,
            is_approved: model.is_approved,
            is_featured: model.is_featured,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TestimonialDto {
    pub id: i32,
    pub customer_name: String,
    pub customer_title: Option<String>,
    pub testimonial_text: String,
    pub rating: i32,
    pub image_filename: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    pub display_order: i32,
    pub created_at: String,
    pub is_active: bool,
}

impl From<testimonials::Model> for TestimonialDto {
    fn from(model: testimonials::Model) -> Self {
        Self {
            id: model.id,
            image_url: image_url(model.image_filename.as_deref()),
            customer_name: model.customer_name,
            customer_title: model.customer_title,
            testimonial_text: model.testimonial_text,
            rating: model.rating,
            image_filename: model.image_filename,
            is_featured: model.is_featured,
            display_order: model.display_order,
            created_at: model.created_at,
            is_active: model.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteSettingsDto {
    pub site_name: String,
    pub site_description: String,
    pub logo_filename: Option<String>,
    pub logo_url: Option<String>,
    pub hero_image_filename: Option<String>,
    pub hero_image_url: Option<String>,
    pub background_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub theme_style: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub whatsapp_number: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub about_text: String,
    pub footer_text: String,
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub show_reviews: bool,
    pub show_custom_orders: bool,
    pub maintenance_mode: bool,
    pub updated_at: String,
}

impl From<&site_settings::Model> for SiteSettingsDto {
    fn from(model: &site_settings::Model) -> Self {
        Self {
            site_name: model.site_name.clone(),
            site_description: model.site_description.clone(),
            logo_filename: model.logo_filename.clone(),
            logo_url: image_url(model.logo_filename.as_deref()),
            hero_image_filename: model.hero_image_filename.clone(),
            hero_image_url: image_url(model.hero_image_filename.as_deref()),
            background_color: model.background_color.clone(),
            secondary_color: model.secondary_color.clone(),
            accent_color: model.accent_color.clone(),
            theme_style: model.theme_style.clone(),
            contact_phone: model.contact_phone.clone(),
            contact_email: model.contact_email.clone(),
            whatsapp_number: model.whatsapp_number.clone(),
            facebook_url: model.facebook_url.clone(),
            instagram_url: model.instagram_url.clone(),
            tiktok_url: model.tiktok_url.clone(),
            about_text: model.about_text.clone(),
            footer_text: model.footer_text.clone(),
            hero_title: model.hero_title.clone(),
            hero_subtitle: model.hero_subtitle.clone(),
            show_reviews: model.show_reviews,
            show_custom_orders: model.show_custom_orders,
            maintenance_mode: model.maintenance_mode,
            updated_at: model.updated_at.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteView {
    pub settings: SiteSettingsDto,
    pub whatsapp: PageLinks,
}

#[derive(Debug, Serialize)]
pub struct HomeView {
    pub settings: SiteSettingsDto,
    pub products: Vec<ProductDto>,
    pub featured_reviews: Vec<ReviewDto>,
    pub featured_testimonials: Vec<TestimonialDto>,
    pub whatsapp: PageLinks,
}

#[derive(Debug, Serialize)]
pub struct ContactView {
    pub settings: SiteSettingsDto,
    pub whatsapp_url: String,
}

#[derive(Debug, Serialize)]
pub struct CustomOrderView {
    pub settings: SiteSettingsDto,
    pub enabled: bool,
    pub whatsapp_url: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub total_products: u64,
    pub approved_reviews: u64,
    pub pending_reviews: u64,
    pub recent_products: Vec<ProductDto>,
    pub recent_reviews: Vec<ReviewDto>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub affected: u64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DisplayOrderRequest {
    pub display_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct BulkReviewRequest {
    pub action: crate::services::BulkAction,
    pub ids: Vec<i32>,
}
