use crate::domain::ReviewState;
use crate::entities::{prelude::*, reviews};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct NewReview {
    pub customer_name: String,
    pub comment: String,
    pub rating: i32,
    pub product_id: Option<i32>,
    pub state: ReviewState,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub customer_name: Option<String>,
    pub comment: Option<String>,
    pub rating: Option<i32>,
    pub product_id: Option<Option<i32>>,
}

/// Admin listing filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    Pending,
    Approved,
    Featured,
}

/// Repository for customer reviews
pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn newest_first(query: Select<Reviews>) -> Select<Reviews> {
        query
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<reviews::Model>> {
        Ok(Reviews::find_by_id(id).one(&self.conn).await?)
    }

    /// Approved reviews, newest first.
    pub async fn list_approved(&self) -> Result<Vec<reviews::Model>> {
        Ok(
            Self::newest_first(Reviews::find().filter(reviews::Column::IsApproved.eq(true)))
                .all(&self.conn)
                .await?,
        )
    }

    /// Approved reviews of one product, newest first.
    pub async fn list_approved_for_product(
        &self,
        product_id: i32,
        limit: u64,
    ) -> Result<Vec<reviews::Model>> {
        Ok(Self::newest_first(
            Reviews::find()
                .filter(reviews::Column::IsApproved.eq(true))
                .filter(reviews::Column::ProductId.eq(product_id)),
        )
        .limit(limit)
        .all(&self.conn)
        .await?)
    }

    pub async fn list_featured(&self, limit: u64) -> Result<Vec<reviews::Model>> {
        Ok(Self::newest_first(
            Reviews::find()
                .filter(reviews::Column::IsApproved.eq(true))
                .filter(reviews::Column::IsFeatured.eq(true)),
        )
        .limit(limit)
        .all(&self.conn)
        .await?)
    }

    pub async fn list(&self, filter: ReviewFilter) -> Result<Vec<reviews::Model>> {
        let query = match filter {
            ReviewFilter::All => Reviews::find(),
            ReviewFilter::Pending => Reviews::find().filter(reviews::Column::IsApproved.eq(false)),
            ReviewFilter::Approved => Reviews::find().filter(reviews::Column::IsApproved.eq(true)),
            ReviewFilter::Featured => Reviews::find()
                .filter(reviews::Column::IsApproved.eq(true))
                .filter(reviews::Column::IsFeatured.eq(true)),
        };

        Ok(Self::newest_first(query).all(&self.conn).await?)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<reviews::Model>> {
        Ok(Self::newest_first(Reviews::find())
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn create(&self, review: NewReview) -> Result<reviews::Model> {
        let (is_approved, is_featured) = review.state.flags();

        let active_model = reviews::ActiveModel {
            customer_name: Set(review.customer_name),
            comment: Set(review.comment),
            rating: Set(review.rating),
            image_filename: Set(None),
            product_id: Set(review.product_id),
            created_at: Set(crate::db::now_timestamp()),
            is_approved: Set(is_approved),
            is_featured: Set(is_featured),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!(
            "Created review {} by {} (approved: {})",
            model.id, model.customer_name, model.is_approved
        );
        Ok(model)
    }

    pub async fn update(&self, id: i32, changes: ReviewChanges) -> Result<Option<reviews::Model>> {
        let txn = self.conn.begin().await?;

        let Some(review) = Reviews::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: reviews::ActiveModel = review.into();
        if let Some(customer_name) = changes.customer_name {
            active.customer_name = Set(customer_name);
        }
        if let Some(comment) = changes.comment {
            active.comment = Set(comment);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        if let Some(product_id) = changes.product_id {
            active.product_id = Set(product_id);
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Some(model))
    }

    /// Moves a review to `state` only if its flags still equal `expected`.
    ///
    /// Both flags are written in one statement. Returns `false` when the row
    /// is gone or another writer changed it first.
    pub async fn swap_state(
        &self,
        id: i32,
        expected: (bool, bool),
        state: ReviewState,
    ) -> Result<bool> {
        let (is_approved, is_featured) = state.flags();

        let result = Reviews::update_many()
            .col_expr(reviews::Column::IsApproved, Expr::value(is_approved))
            .col_expr(reviews::Column::IsFeatured, Expr::value(is_featured))
            .filter(reviews::Column::Id.eq(id))
            .filter(reviews::Column::IsApproved.eq(expected.0))
            .filter(reviews::Column::IsFeatured.eq(expected.1))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Sends the listed reviews back to pending, clearing any featured mark.
    pub async fn reject_many(&self, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let (is_approved, is_featured) = ReviewState::Pending.flags();

        let result = Reviews::update_many()
            .col_expr(reviews::Column::IsApproved, Expr::value(is_approved))
            .col_expr(reviews::Column::IsFeatured, Expr::value(is_featured))
            .filter(reviews::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Approves the listed reviews that are still pending.
    ///
    /// Rows already approved, featured or not, are left untouched.
    pub async fn approve_pending(&self, ids: &[i32]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let (is_approved, is_featured) = ReviewState::Approved.flags();

        let result = Reviews::update_many()
            .col_expr(reviews::Column::IsApproved, Expr::value(is_approved))
            .col_expr(reviews::Column::IsFeatured, Expr::value(is_featured))
            .filter(reviews::Column::Id.is_in(ids.iter().copied()))
            .filter(reviews::Column::IsApproved.eq(false))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Returns the previous filename, or `None` if the review does not exist.
    pub async fn set_image(
        &self,
        id: i32,
        filename: Option<String>,
    ) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(review) = Reviews::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let previous = review.image_filename.clone();
        let mut active: reviews::ActiveModel = review.into();
        active.image_filename = Set(filename);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(previous))
    }

    pub async fn delete(&self, id: i32) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(review) = Reviews::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        Reviews::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted review {} by {}", id, review.customer_name);
        Ok(Some(review.image_filename))
    }

    /// Deletes every listed review in one transaction.
    ///
    /// Returns the number of rows removed and the image filenames they owned.
    pub async fn delete_many(&self, ids: &[i32]) -> Result<(u64, Vec<String>)> {
        if ids.is_empty() {
            return Ok((0, Vec::new()));
        }

        let txn = self.conn.begin().await?;

        let images: Vec<Option<String>> = Reviews::find()
            .select_only()
            .column(reviews::Column::ImageFilename)
            .filter(reviews::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&txn)
            .await?;

        let result = Reviews::delete_many()
            .filter(reviews::Column::Id.is_in(ids.iter().copied()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok((result.rows_affected, images.into_iter().flatten().collect()))
    }
}
