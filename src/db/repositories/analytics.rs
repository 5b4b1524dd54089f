use crate::entities::{prelude::*, products, reviews, testimonials};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductCounts {
    pub total: u64,
    pub active: u64,
    pub featured: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewCounts {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub featured: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestimonialCounts {
    pub total: u64,
    pub active: u64,
    pub featured: u64,
}

/// Raw aggregate reads. Derived figures live in `services::analytics`.
pub struct AnalyticsRepository {
    conn: DatabaseConnection,
}

impl AnalyticsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn product_counts(&self) -> Result<ProductCounts> {
        let total = Products::find().count(&self.conn).await?;
        let active = Products::find()
            .filter(products::Column::IsActive.eq(true))
            .count(&self.conn)
            .await?;
        let featured = Products::find()
            .filter(products::Column::Featured.eq(true))
            .count(&self.conn)
            .await?;

        Ok(ProductCounts {
            total,
            active,
            featured,
        })
    }

    pub async fn review_counts(&self) -> Result<ReviewCounts> {
        let total = Reviews::find().count(&self.conn).await?;
        let approved = Reviews::find()
            .filter(reviews::Column::IsApproved.eq(true))
            .count(&self.conn)
            .await?;
        let featured = Reviews::find()
            .filter(reviews::Column::IsApproved.eq(true))
            .filter(reviews::Column::IsFeatured.eq(true))
            .count(&self.conn)
            .await?;

        Ok(ReviewCounts {
            total,
            approved,
            pending: total.saturating_sub(approved),
            featured,
        })
    }

    pub async fn testimonial_counts(&self) -> Result<TestimonialCounts> {
        let total = Testimonials::find().count(&self.conn).await?;
        let active = Testimonials::find()
            .filter(testimonials::Column::IsActive.eq(true))
            .count(&self.conn)
            .await?;
        let featured = Testimonials::find()
            .filter(testimonials::Column::IsFeatured.eq(true))
            .count(&self.conn)
            .await?;

        Ok(TestimonialCounts {
            total,
            active,
            featured,
        })
    }

    /// Ratings of every approved review.
    pub async fn approved_ratings(&self) -> Result<Vec<i32>> {
        Ok(Reviews::find()
            .select_only()
            .column(reviews::Column::Rating)
            .filter(reviews::Column::IsApproved.eq(true))
            .into_tuple()
            .all(&self.conn)
            .await?)
    }

    /// Category of every active product, one entry per product.
    pub async fn active_product_categories(&self) -> Result<Vec<Option<String>>> {
        Ok(Products::find()
            .select_only()
            .column(products::Column::Category)
            .filter(products::Column::IsActive.eq(true))
            .into_tuple()
            .all(&self.conn)
            .await?)
    }
}
