use crate::entities::{prelude::*, testimonials};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Select, Set, TransactionTrait,
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewTestimonial {
    pub customer_name: String,
    pub customer_title: Option<String>,
    pub testimonial_text: String,
    pub rating: i32,
    pub is_featured: bool,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TestimonialChanges {
    pub customer_name: Option<String>,
    pub customer_title: Option<Option<String>>,
    pub testimonial_text: Option<String>,
    pub rating: Option<i32>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

pub struct TestimonialRepository {
    conn: DatabaseConnection,
}

impl TestimonialRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// `display_order` ascending, then newest first.
    fn display_ordered(query: Select<Testimonials>) -> Select<Testimonials> {
        query
            .order_by_asc(testimonials::Column::DisplayOrder)
            .order_by_desc(testimonials::Column::CreatedAt)
            .order_by_desc(testimonials::Column::Id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<testimonials::Model>> {
        Ok(Testimonials::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn list_active(&self, featured_only: bool) -> Result<Vec<testimonials::Model>> {
        let mut query = Testimonials::find().filter(testimonials::Column::IsActive.eq(true));
        if featured_only {
            query = query.filter(testimonials::Column::IsFeatured.eq(true));
        }

        Ok(Self::display_ordered(query).all(&self.conn).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<testimonials::Model>> {
        Ok(Self::display_ordered(Testimonials::find())
            .all(&self.conn)
            .await?)
    }

    pub async fn create(&self, testimonial: NewTestimonial) -> Result<testimonials::Model> {
        let active_model = testimonials::ActiveModel {
            customer_name: Set(testimonial.customer_name),
            customer_title: Set(testimonial.customer_title),
            testimonial_text: Set(testimonial.testimonial_text),
            rating: Set(testimonial.rating),
            image_filename: Set(None),
            is_featured: Set(testimonial.is_featured),
            display_order: Set(testimonial.display_order),
            created_at: Set(crate::db::now_timestamp()),
            is_active: Set(testimonial.is_active),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Created testimonial {} for {}", model.id, model.customer_name);
        Ok(model)
    }

    pub async fn update(
        &self,
        id: i32,
        changes: TestimonialChanges,
    ) -> Result<Option<testimonials::Model>> {
        let txn = self.conn.begin().await?;

        let Some(testimonial) = Testimonials::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: testimonials::ActiveModel = testimonial.into();
        if let Some(customer_name) = changes.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(customer_title) = changes.customer_title {
            active.customer_title = Set(customer_title);
        }
        if let Some(text) = changes.testimonial_text {
            active.testimonial_text = Set(text);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(is_featured) = changes.is_featured {
            active.is_featured = Set(is_featured);
        }
        if let Some(display_order) = changes.display_order {
            active.display_order = Set(display_order);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Some(model))
    }

    pub async fn set_display_order(
        &self,
        id: i32,
        display_order: i32,
    ) -> Result<Option<testimonials::Model>> {
        self.update(
            id,
            TestimonialChanges {
                display_order: Some(display_order),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn toggle_active(&self, id: i32) -> Result<Option<testimonials::Model>> {
        let txn = self.conn.begin().await?;

        let Some(testimonial) = Testimonials::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let next = !testimonial.is_active;
        let mut active: testimonials::ActiveModel = testimonial.into();
        active.is_active = Set(next);
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    pub async fn toggle_featured(&self, id: i32) -> Result<Option<testimonials::Model>> {
        let txn = self.conn.begin().await?;

        let Some(testimonial) = Testimonials::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let next = !testimonial.is_featured;
        let mut active: testimonials::ActiveModel = testimonial.into();
        active.is_featured = Set(next);
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    pub async fn set_image(
        &self,
        id: i32,
        filename: Option<String>,
    ) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(testimonial) = Testimonials::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let previous = testimonial.image_filename.clone();
        let mut active: testimonials::ActiveModel = testimonial.into();
        active.image_filename = Set(filename);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(previous))
    }

    pub async fn delete(&self, id: i32) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(testimonial) = Testimonials::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        Testimonials::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted testimonial {} for {}", id, testimonial.customer_name);
        Ok(Some(testimonial.image_filename))
    }
}
