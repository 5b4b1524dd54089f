use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "testimonials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_name: String,

    /// Short label shown under the name, e.g. "عميلة مميزة"
    pub customer_title: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub testimonial_text: String,

    pub rating: i32,

    pub image_filename: Option<String>,

    pub is_featured: bool,

    pub display_order: i32,

    pub created_at: String,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
