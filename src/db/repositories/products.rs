use crate::entities::{prelude::*, products};
use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;

/// Validated values for a new product row.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Option<String>,
    pub is_active: bool,
    pub featured: bool,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub category: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
}

/// Public listing filter. Every field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Substring of name, description or category.
    pub search: Option<String>,
    pub featured_only: bool,
}

/// Repository for catalog products
pub struct ProductRepository {
    conn: DatabaseConnection,
}

impl ProductRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<products::Model>> {
        Ok(Products::find_by_id(id).one(&self.conn).await?)
    }

    pub async fn get_active(&self, id: i32) -> Result<Option<products::Model>> {
        Ok(Products::find_by_id(id)
            .filter(products::Column::IsActive.eq(true))
            .one(&self.conn)
            .await?)
    }

    /// One page of active products, newest first.
    ///
    /// `page` is 1-based. Returns the page and the total number of matches.
    pub async fn list_active(
        &self,
        filter: &ProductFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<products::Model>, u64)> {
        let mut query = Products::find().filter(products::Column::IsActive.eq(true));

        if let Some(category) = &filter.category {
            query = query.filter(products::Column::Category.eq(category.as_str()));
        }

        if let Some(term) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(products::Column::Name.contains(term.as_str()))
                    .add(products::Column::Description.contains(term.as_str()))
                    .add(products::Column::Category.contains(term.as_str())),
            );
        }

        if filter.featured_only {
            query = query.filter(products::Column::Featured.eq(true));
        }

        let paginator = query
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .paginate(&self.conn, page_size);
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok((items, total))
    }

    /// Active products for the home page: featured first, then newest.
    pub async fn list_home(&self, limit: u64) -> Result<Vec<products::Model>> {
        Ok(Products::find()
            .filter(products::Column::IsActive.eq(true))
            .order_by_desc(products::Column::Featured)
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    pub async fn list_all(&self) -> Result<Vec<products::Model>> {
        Ok(Products::find()
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(&self.conn)
            .await?)
    }

    pub async fn recent(&self, limit: u64) -> Result<Vec<products::Model>> {
        Ok(Products::find()
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    /// Distinct non-blank categories among active products, sorted.
    pub async fn active_categories(&self) -> Result<Vec<String>> {
        let rows: Vec<Option<String>> = Products::find()
            .select_only()
            .column(products::Column::Category)
            .distinct()
            .filter(products::Column::IsActive.eq(true))
            .order_by_asc(products::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .flatten()
            .filter(|c| !c.trim().is_empty())
            .collect())
    }

    pub async fn create(&self, product: NewProduct) -> Result<products::Model> {
        let active_model = products::ActiveModel {
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            category: Set(product.category),
            image_filename: Set(None),
            created_at: Set(crate::db::now_timestamp()),
            is_active: Set(product.is_active),
            featured: Set(product.featured),
            ..Default::default()
        };

        let model = active_model.insert(&self.conn).await?;
        info!("Created product {}: {}", model.id, model.name);
        Ok(model)
    }

    pub async fn update(&self, id: i32, changes: ProductChanges) -> Result<Option<products::Model>> {
        let txn = self.conn.begin().await?;

        let Some(product) = Products::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: products::ActiveModel = product.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(price) = changes.price {
            active.price = Set(price);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(featured) = changes.featured {
            active.featured = Set(featured);
        }

        let model = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Some(model))
    }

    pub async fn toggle_active(&self, id: i32) -> Result<Option<products::Model>> {
        let txn = self.conn.begin().await?;

        let Some(product) = Products::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let next = !product.is_active;
        let mut active: products::ActiveModel = product.into();
        active.is_active = Set(next);
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    pub async fn toggle_featured(&self, id: i32) -> Result<Option<products::Model>> {
        let txn = self.conn.begin().await?;

        let Some(product) = Products::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let next = !product.featured;
        let mut active: products::ActiveModel = product.into();
        active.featured = Set(next);
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(model))
    }

    /// Points the product at a new stored image.
    ///
    /// Returns the previous filename, or `None` if the product does not exist.
    pub async fn set_image(
        &self,
        id: i32,
        filename: Option<String>,
    ) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(product) = Products::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let previous = product.image_filename.clone();
        let mut active: products::ActiveModel = product.into();
        active.image_filename = Set(filename);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(previous))
    }

    /// Deletes the row and returns its image filename, or `None` if missing.
    pub async fn delete(&self, id: i32) -> Result<Option<Option<String>>> {
        let txn = self.conn.begin().await?;

        let Some(product) = Products::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        Products::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        info!("Deleted product {}: {}", id, product.name);
        Ok(Some(product.image_filename))
    }
}
