use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AnalyticsService, AuthService, CatalogService, ReviewService, SeaOrmAuthService,
    SeaOrmCatalogService, SeaOrmReviewService, SeaOrmSettingsService, SeaOrmTestimonialService,
    SettingsService, TestimonialService, UploadStore,
};

/// Long-lived services shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub uploads: Arc<UploadStore>,

    pub catalog: Arc<dyn CatalogService>,

    pub reviews: Arc<dyn ReviewService>,

    pub testimonials: Arc<dyn TestimonialService>,

    pub settings: Arc<dyn SettingsService>,

    pub auth: Arc<dyn AuthService>,

    pub analytics: Arc<AnalyticsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let uploads = Arc::new(UploadStore::new(&config.uploads));

        let catalog = Arc::new(SeaOrmCatalogService::new(
            store.clone(),
            uploads.clone(),
            config.storefront.home_product_limit,
        )) as Arc<dyn CatalogService>;

        let reviews = Arc::new(SeaOrmReviewService::new(
            store.clone(),
            uploads.clone(),
            config.storefront.featured_review_limit,
        )) as Arc<dyn ReviewService>;

        let testimonials = Arc::new(SeaOrmTestimonialService::new(
            store.clone(),
            uploads.clone(),
        )) as Arc<dyn TestimonialService>;

        let settings = Arc::new(SeaOrmSettingsService::new(store.clone(), uploads.clone()))
            as Arc<dyn SettingsService>;

        let auth = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let analytics = Arc::new(AnalyticsService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            uploads,
            catalog,
            reviews,
            testimonials,
            settings,
            auth,
            analytics,
        }
    }
}
