use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::{
    AnalyticsService, AuthService, CatalogService, ReviewService, SettingsService,
    TestimonialService, UploadStore,
};
use crate::state::SharedState;

pub mod admin;
pub mod auth;
mod error;
mod observability;
mod products;
mod reviews;
pub mod storefront;
mod system;
mod testimonials;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn uploads(&self) -> &Arc<UploadStore> {
        &self.shared.uploads
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn CatalogService> {
        &self.shared.catalog
    }

    #[must_use]
    pub fn review_service(&self) -> &Arc<dyn ReviewService> {
        &self.shared.reviews
    }

    #[must_use]
    pub fn testimonial_service(&self) -> &Arc<dyn TestimonialService> {
        &self.shared.testimonials
    }

    #[must_use]
    pub fn settings_service(&self) -> &Arc<dyn SettingsService> {
        &self.shared.settings
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth
    }

    #[must_use]
    pub fn analytics(&self) -> &Arc<AnalyticsService> {
        &self.shared.analytics
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let config = state.config().clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(create_public_router(state.clone()))
        .merge(create_auth_router())
        .nest(
            "/admin",
            admin::router().layer(DefaultBodyLimit::max(config.uploads.max_upload_bytes)),
        )
        .route("/system/health/live", get(system::health_live))
        .route("/system/health/ready", get(system::health_ready))
        .layer(session_layer)
        .with_state(state);

    let cors_origins = &config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.uploads.path))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Storefront routes. Every one sees the site settings; all but `/site`
/// close during maintenance.
fn create_public_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let gated = Router::new()
        .route("/home", get(storefront::home))
        .route("/pages/contact", get(storefront::contact_page))
        .route("/pages/custom-order", get(storefront::custom_order_page))
        .route("/whatsapp/{product_id}", get(storefront::whatsapp_redirect))
        .route("/products", get(products::list_products))
        .route("/products/categories", get(products::list_categories))
        .route("/products/{id}", get(products::get_product))
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::submit_review),
        )
        .route("/reviews/featured", get(reviews::list_featured))
        .route("/reviews/stats", get(reviews::get_stats))
        .route(
            "/reviews/product/{product_id}",
            get(reviews::list_product_reviews),
        )
        .route("/testimonials", get(testimonials::list_testimonials))
        .route_layer(middleware::from_fn(storefront::maintenance_gate));

    Router::new()
        .route("/site", get(storefront::site))
        .merge(gated)
        .route_layer(middleware::from_fn_with_state(
            state,
            storefront::load_settings,
        ))
}

fn create_auth_router() -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/auth/me", get(auth::get_current_admin))
        .route("/auth/password", put(auth::change_password))
        .route_layer(middleware::from_fn(auth::auth_middleware));

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(protected)
}
