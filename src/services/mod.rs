pub mod analytics;
pub use analytics::{AnalyticsService, AnalyticsSnapshot, Dashboard, RatingSummary};

pub mod uploads;
pub use uploads::{ImageUpload, UploadError, UploadStore};

pub mod whatsapp;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AdminInfo, AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, ProductDraft, ProductPage};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod review_service;
pub mod review_service_impl;
pub use review_service::{BulkAction, ReviewDraft, ReviewEdit, ReviewError, ReviewService};
pub use review_service_impl::SeaOrmReviewService;

pub mod testimonial_service;
pub mod testimonial_service_impl;
pub use testimonial_service::{TestimonialDraft, TestimonialError, TestimonialService};
pub use testimonial_service_impl::SeaOrmTestimonialService;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{SettingsError, SettingsService, SettingsUpdate};
pub use settings_service_impl::SeaOrmSettingsService;
