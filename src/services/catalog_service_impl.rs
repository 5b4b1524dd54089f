//! `SeaORM` implementation of the `CatalogService` trait.

use crate::constants::CATEGORY_ALL;
use crate::constants::limits::{
    CATEGORY_MAX_LEN, MAX_PRODUCT_PAGE_SIZE, NAME_MAX_LEN, SEARCH_MAX_LEN,
};
use crate::db::{NewProduct, ProductChanges, ProductFilter, Store};
use crate::domain::validate;
use crate::entities::products;
use crate::services::catalog_service::{CatalogError, CatalogService, ProductDraft, ProductPage};
use crate::services::uploads::{ImageUpload, UploadStore};
use async_trait::async_trait;
use std::sync::Arc;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims the public listing query and checks its paging bounds.
fn normalize_listing(
    filter: ProductFilter,
    page: u64,
    page_size: u64,
) -> Result<(ProductFilter, u64, u64), CatalogError> {
    if page == 0 {
        return Err(CatalogError::Validation(
            "Page number must be >= 1".to_string(),
        ));
    }
    if !(1..=MAX_PRODUCT_PAGE_SIZE).contains(&page_size) {
        return Err(CatalogError::Validation(format!(
            "Limit must be between 1 and {MAX_PRODUCT_PAGE_SIZE}"
        )));
    }

    let search = non_blank(filter.search);
    if search
        .as_deref()
        .is_some_and(|s| s.chars().count() > SEARCH_MAX_LEN)
    {
        return Err(CatalogError::Validation(format!(
            "Search must be at most {SEARCH_MAX_LEN} characters"
        )));
    }

    let filter = ProductFilter {
        category: non_blank(filter.category).filter(|c| c != CATEGORY_ALL),
        search,
        featured_only: filter.featured_only,
    };
    Ok((filter, page, page_size))
}

pub struct SeaOrmCatalogService {
    store: Store,
    uploads: Arc<UploadStore>,
    home_limit: u64,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadStore>, home_limit: u64) -> Self {
        Self {
            store,
            uploads,
            home_limit,
        }
    }

    fn validate_new(draft: ProductDraft) -> Result<NewProduct, CatalogError> {
        let name = validate::required_text(
            "Product name",
            draft.name.as_deref().unwrap_or_default(),
            NAME_MAX_LEN,
        )
        .map_err(CatalogError::Validation)?;

        let price = draft
            .price
            .ok_or_else(|| CatalogError::Validation("Price is required".to_string()))
            .and_then(|p| validate::price(p).map_err(CatalogError::Validation))?;

        Ok(NewProduct {
            name,
            description: validate::optional_text(
                "Description",
                draft.description.as_deref(),
                usize::MAX,
            )
            .map_err(CatalogError::Validation)?,
            price,
            category: validate::optional_text("Category", draft.category.as_deref(), CATEGORY_MAX_LEN)
                .map_err(CatalogError::Validation)?,
            is_active: draft.is_active.unwrap_or(true),
            featured: draft.featured.unwrap_or(false),
        })
    }

    fn validate_changes(draft: ProductDraft) -> Result<ProductChanges, CatalogError> {
        let name = draft
            .name
            .map(|n| validate::required_text("Product name", &n, NAME_MAX_LEN))
            .transpose()
            .map_err(CatalogError::Validation)?;

        let price = draft
            .price
            .map(validate::price)
            .transpose()
            .map_err(CatalogError::Validation)?;

        let description = draft
            .description
            .map(|d| validate::optional_text("Description", Some(&d), usize::MAX))
            .transpose()
            .map_err(CatalogError::Validation)?;

        let category = draft
            .category
            .map(|c| validate::optional_text("Category", Some(&c), CATEGORY_MAX_LEN))
            .transpose()
            .map_err(CatalogError::Validation)?;

        Ok(ProductChanges {
            name,
            description,
            price,
            category,
            is_active: draft.is_active,
            featured: draft.featured,
        })
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn home_products(&self) -> Result<Vec<products::Model>, CatalogError> {
        Ok(self.store.products().list_home(self.home_limit).await?)
    }

    async fn list_active(
        &self,
        filter: ProductFilter,
        page: u64,
        page_size: u64,
    ) -> Result<ProductPage, CatalogError> {
        let (filter, page, page_size) = normalize_listing(filter, page, page_size)?;

        let (products, total) = self
            .store
            .products()
            .list_active(&filter, page, page_size)
            .await?;

        Ok(ProductPage { products, total })
    }

    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        Ok(self.store.products().active_categories().await?)
    }

    async fn get_active(&self, id: i32) -> Result<products::Model, CatalogError> {
        self.store
            .products()
            .get_active(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn list_all(&self) -> Result<Vec<products::Model>, CatalogError> {
        Ok(self.store.products().list_all().await?)
    }

    async fn get(&self, id: i32) -> Result<products::Model, CatalogError> {
        self.store
            .products()
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn create(&self, draft: ProductDraft) -> Result<products::Model, CatalogError> {
        let product = Self::validate_new(draft)?;
        Ok(self.store.products().create(product).await?)
    }

    async fn update(&self, id: i32, draft: ProductDraft) -> Result<products::Model, CatalogError> {
        let changes = Self::validate_changes(draft)?;
        self.store
            .products()
            .update(id, changes)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), CatalogError> {
        let image = self
            .store
            .products()
            .delete(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.uploads.delete_if_some(image).await;
        Ok(())
    }

    async fn toggle_active(&self, id: i32) -> Result<products::Model, CatalogError> {
        self.store
            .products()
            .toggle_active(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn toggle_featured(&self, id: i32) -> Result<products::Model, CatalogError> {
        self.store
            .products()
            .toggle_featured(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn set_image(
        &self,
        id: i32,
        upload: ImageUpload,
    ) -> Result<products::Model, CatalogError> {
        let repo = self.store.products();
        self.uploads
            .replace(&upload, |filename| async move {
                repo.set_image(id, Some(filename)).await
            })
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.get(id).await
    }

    async fn remove_image(&self, id: i32) -> Result<products::Model, CatalogError> {
        let previous = self
            .store
            .products()
            .set_image(id, None)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.uploads.delete_if_some(previous).await;
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_requires_name_and_positive_price() {
        let missing_name = ProductDraft {
            price: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            SeaOrmCatalogService::validate_new(missing_name),
            Err(CatalogError::Validation(_))
        ));

        let free = ProductDraft {
            name: Some("كوب".to_string()),
            price: Some(0.0),
            ..Default::default()
        };
        assert!(matches!(
            SeaOrmCatalogService::validate_new(free),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn new_product_defaults_to_active_and_not_featured() {
        let draft = ProductDraft {
            name: Some(" مزهرية ".to_string()),
            price: Some(45.0),
            category: Some(String::new()),
            ..Default::default()
        };
        let product = SeaOrmCatalogService::validate_new(draft).unwrap();
        assert_eq!(product.name, "مزهرية");
        assert!(product.is_active);
        assert!(!product.featured);
        assert_eq!(product.category, None);
    }

    #[test]
    fn empty_strings_clear_optional_columns_on_update() {
        let draft = ProductDraft {
            description: Some(String::new()),
            category: Some("  ".to_string()),
            ..Default::default()
        };
        let changes = SeaOrmCatalogService::validate_changes(draft).unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.category, Some(None));
        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
    }

    #[test]
    fn overlong_category_is_rejected() {
        let draft = ProductDraft {
            category: Some("x".repeat(CATEGORY_MAX_LEN + 1)),
            ..Default::default()
        };
        assert!(SeaOrmCatalogService::validate_changes(draft).is_err());
    }

    #[test]
    fn listing_query_is_trimmed_and_bounded() {
        let (filter, page, size) = normalize_listing(
            ProductFilter {
                category: Some(CATEGORY_ALL.to_string()),
                search: Some("  مزهرية ".to_string()),
                featured_only: true,
            },
            2,
            10,
        )
        .unwrap();
        assert_eq!(filter.category, None);
        assert_eq!(filter.search.as_deref(), Some("مزهرية"));
        assert!(filter.featured_only);
        assert_eq!((page, size), (2, 10));

        assert!(normalize_listing(ProductFilter::default(), 0, 10).is_err());
        assert!(normalize_listing(ProductFilter::default(), 1, 0).is_err());
        assert!(
            normalize_listing(ProductFilter::default(), 1, MAX_PRODUCT_PAGE_SIZE + 1).is_err()
        );
    }
}
