use sea_orm_migration::prelude::*;

mod m20250601_initial;
mod m20250602_add_admins;
mod m20250610_add_listing_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_initial::Migration),
            Box::new(m20250602_add_admins::Migration),
            Box::new(m20250610_add_listing_indexes::Migration),
        ]
    }
}
