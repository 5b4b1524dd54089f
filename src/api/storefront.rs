//! Site-wide page data: settings, home page, static pages and the WhatsApp
//! order redirect.
//!
//! [`load_settings`] reads the settings row once per request and hands it to
//! handlers as a [`SiteContext`] extension.

use axum::{
    Extension, Json,
    extract::{Path, Request, State},
    middleware::Next,
    response::{Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_admin;
use super::validation::validate_id;
use super::{
    ApiError, ApiResponse, AppState, ContactView, CustomOrderView, HomeView, ProductDto,
    ReviewDto, SiteSettingsDto, SiteView, TestimonialDto,
};
use crate::constants::messages;
use crate::entities::site_settings;
use crate::services::SettingsError;
use crate::services::whatsapp::{self, PageLinks};

/// Settings as read at the start of the request.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub settings: Arc<site_settings::Model>,
    /// Destination for every WhatsApp link on the page.
    pub whatsapp_number: String,
}

impl SiteContext {
    fn settings_dto(&self) -> SiteSettingsDto {
        SiteSettingsDto::from(self.settings.as_ref())
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Validation(msg) => Self::validation(msg),
            SettingsError::Upload(e) => e.into(),
            SettingsError::Database(msg) => Self::DatabaseError(msg),
            SettingsError::Internal(msg) => Self::internal(msg),
        }
    }
}

pub async fn load_settings(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let settings = state.settings_service().get().await?;
    let whatsapp_number = whatsapp::resolve_number(
        settings.whatsapp_number.as_deref(),
        &state.config().storefront.whatsapp_number,
    )
    .to_string();

    request.extensions_mut().insert(SiteContext {
        settings: Arc::new(settings),
        whatsapp_number,
    });

    Ok(next.run(request).await)
}

/// Answers 503 while the site is in maintenance, unless an admin is logged in.
pub async fn maintenance_gate(
    session: Session,
    Extension(site): Extension<SiteContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if site.settings.maintenance_mode && session_admin(&session).await?.is_none() {
        return Err(ApiError::ServiceUnavailable(messages::MAINTENANCE.to_string()));
    }
    Ok(next.run(request).await)
}

/// GET /site
pub async fn site(Extension(site): Extension<SiteContext>) -> Json<ApiResponse<SiteView>> {
    Json(ApiResponse::success(SiteView {
        settings: site.settings_dto(),
        whatsapp: PageLinks::for_number(&site.whatsapp_number),
    }))
}

/// GET /home
pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
) -> Result<Json<ApiResponse<HomeView>>, ApiError> {
    let products = state
        .catalog_service()
        .home_products()
        .await?
        .into_iter()
        .map(|p| ProductDto::from(p).with_order_link(&site.whatsapp_number))
        .collect();

    let featured_reviews = if site.settings.show_reviews {
        state
            .review_service()
            .list_featured(None)
            .await?
            .into_iter()
            .map(ReviewDto::from)
            .collect()
    } else {
        Vec::new()
    };

    let featured_testimonials = state
        .testimonial_service()
        .list_public(true)
        .await?
        .into_iter()
        .map(TestimonialDto::from)
        .collect();

    Ok(Json(ApiResponse::success(HomeView {
        settings: site.settings_dto(),
        products,
        featured_reviews,
        featured_testimonials,
        whatsapp: PageLinks::for_number(&site.whatsapp_number),
    })))
}

/// GET /pages/contact
pub async fn contact_page(Extension(site): Extension<SiteContext>) -> Json<ApiResponse<ContactView>> {
    Json(ApiResponse::success(ContactView {
        settings: site.settings_dto(),
        whatsapp_url: whatsapp::build(&site.whatsapp_number, None, None),
    }))
}

/// GET /pages/custom-order
pub async fn custom_order_page(
    Extension(site): Extension<SiteContext>,
) -> Json<ApiResponse<CustomOrderView>> {
    Json(ApiResponse::success(CustomOrderView {
        settings: site.settings_dto(),
        enabled: site.settings.show_custom_orders,
        whatsapp_url: whatsapp::build(&site.whatsapp_number, None, Some(messages::CUSTOM_ORDER)),
        message: messages::CUSTOM_ORDER,
    }))
}

/// GET /whatsapp/{product_id}
///
/// Redirects to the order link of an active product.
pub async fn whatsapp_redirect(
    State(state): State<Arc<AppState>>,
    Extension(site): Extension<SiteContext>,
    Path(product_id): Path<i32>,
) -> Result<Redirect, ApiError> {
    let product_id = validate_id("product", product_id)?;
    let product = state.catalog_service().get_active(product_id).await?;

    let link = whatsapp::build(&site.whatsapp_number, Some(&product.name), None);
    Ok(Redirect::to(&link))
}
