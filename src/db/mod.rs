use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::admin::Admin;
pub use repositories::analytics::{ProductCounts, ReviewCounts, TestimonialCounts};
pub use repositories::products::{NewProduct, ProductChanges, ProductFilter};
pub use repositories::reviews::{NewReview, ReviewChanges, ReviewFilter};
pub use repositories::settings::{ImageSlot, SettingsChanges};
pub use repositories::testimonials::{NewTestimonial, TestimonialChanges};

/// Current time as a fixed-width RFC 3339 UTC string.
///
/// Microsecond precision with a `Z` suffix keeps lexical and chronological
/// order identical, which the `created_at` sort keys rely on.
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent()
                && !parent.as_os_str().is_empty()
            {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn products(&self) -> repositories::products::ProductRepository {
        repositories::products::ProductRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn reviews(&self) -> repositories::reviews::ReviewRepository {
        repositories::reviews::ReviewRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn testimonials(&self) -> repositories::testimonials::TestimonialRepository {
        repositories::testimonials::TestimonialRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn settings(&self) -> repositories::settings::SettingsRepository {
        repositories::settings::SettingsRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn analytics(&self) -> repositories::analytics::AnalyticsRepository {
        repositories::analytics::AnalyticsRepository::new(self.conn.clone())
    }

    fn admin_repo(&self) -> repositories::admin::AdminRepository {
        repositories::admin::AdminRepository::new(self.conn.clone())
    }

    pub async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        self.admin_repo().get_by_username(username).await
    }

    pub async fn get_admin(&self, id: i32) -> Result<Option<Admin>> {
        self.admin_repo().get_by_id(id).await
    }

    pub async fn verify_admin_password(&self, username: &str, password: &str) -> Result<bool> {
        self.admin_repo().verify_password(username, password).await
    }

    pub async fn update_admin_password(
        &self,
        username: &str,
        new_password: &str,
        config: Option<&crate::config::SecurityConfig>,
    ) -> Result<()> {
        self.admin_repo()
            .update_password(username, new_password, config)
            .await
    }

    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        config: Option<&crate::config::SecurityConfig>,
    ) -> Result<Option<Admin>> {
        self.admin_repo().create(username, password, config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_fixed_width_and_ordered() {
        let a = now_timestamp();
        std::thread::sleep(Duration::from_millis(2));
        let b = now_timestamp();
        assert_eq!(a.len(), b.len());
        assert!(a.ends_with('Z'));
        assert!(a < b);
    }
}
