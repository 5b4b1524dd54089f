use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_reviews_approved_created ON reviews(is_approved, created_at)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_testimonials_active_order ON testimonials(is_active, display_order)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_products_active_category ON products(is_active, category)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_products_active_category")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_testimonials_active_order")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_reviews_approved_created")
            .await?;

        Ok(())
    }
}
