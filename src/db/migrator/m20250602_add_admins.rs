use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const BOOTSTRAP_USERNAME: &str = "admin";

/// Change after first login.
pub const BOOTSTRAP_PASSWORD: &str = "admin123";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(Admins)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = crate::db::now_timestamp();
        let password_hash =
            crate::db::repositories::admin::hash_password(BOOTSTRAP_PASSWORD, None)
                .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))?;

        let insert = sea_orm_migration::sea_query::Query::insert()
            .into_table(Admins)
            .columns([
                crate::entities::admins::Column::Username,
                crate::entities::admins::Column::PasswordHash,
                crate::entities::admins::Column::CreatedAt,
                crate::entities::admins::Column::UpdatedAt,
            ])
            .values_panic([
                BOOTSTRAP_USERNAME.into(),
                password_hash.into(),
                now.clone().into(),
                now.into(),
            ])
            .on_conflict(
                OnConflict::column(crate::entities::admins::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins).to_owned())
            .await?;

        Ok(())
    }
}
