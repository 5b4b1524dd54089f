//! `SeaORM` implementation of the `TestimonialService` trait.

use crate::constants::limits::NAME_MAX_LEN;
use crate::db::{NewTestimonial, Store, TestimonialChanges};
use crate::domain::{Rating, validate};
use crate::entities::testimonials;
use crate::services::testimonial_service::{
    TestimonialDraft, TestimonialError, TestimonialService,
};
use crate::services::uploads::{ImageUpload, UploadStore};
use async_trait::async_trait;
use std::sync::Arc;

pub struct SeaOrmTestimonialService {
    store: Store,
    uploads: Arc<UploadStore>,
}

impl SeaOrmTestimonialService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadStore>) -> Self {
        Self { store, uploads }
    }

    fn validate_new(draft: TestimonialDraft) -> Result<NewTestimonial, TestimonialError> {
        let customer_name = validate::required_text(
            "Customer name",
            draft.customer_name.as_deref().unwrap_or_default(),
            NAME_MAX_LEN,
        )
        .map_err(TestimonialError::Validation)?;

        let testimonial_text = validate::required_body(
            "Testimonial text",
            draft.testimonial_text.as_deref().unwrap_or_default(),
        )
        .map_err(TestimonialError::Validation)?;

        let customer_title =
            validate::optional_text("Customer title", draft.customer_title.as_deref(), NAME_MAX_LEN)
                .map_err(TestimonialError::Validation)?;

        let rating = Rating::from_optional(draft.rating)
            .map_err(|e| TestimonialError::Validation(e.to_string()))?;

        Ok(NewTestimonial {
            customer_name,
            customer_title,
            testimonial_text,
            rating: rating.value(),
            is_featured: draft.is_featured.unwrap_or(false),
            display_order: draft.display_order.unwrap_or(0),
            is_active: draft.is_active.unwrap_or(true),
        })
    }

    fn validate_changes(draft: TestimonialDraft) -> Result<TestimonialChanges, TestimonialError> {
        let customer_name = draft
            .customer_name
            .map(|n| validate::required_text("Customer name", &n, NAME_MAX_LEN))
            .transpose()
            .map_err(TestimonialError::Validation)?;

        let testimonial_text = draft
            .testimonial_text
            .map(|t| validate::required_body("Testimonial text", &t))
            .transpose()
            .map_err(TestimonialError::Validation)?;

        let customer_title = draft
            .customer_title
            .map(|t| validate::optional_text("Customer title", Some(&t), NAME_MAX_LEN))
            .transpose()
            .map_err(TestimonialError::Validation)?;

        let rating = draft
            .rating
            .map(Rating::try_from)
            .transpose()
            .map_err(|e| TestimonialError::Validation(e.to_string()))?;

        Ok(TestimonialChanges {
            customer_name,
            customer_title,
            testimonial_text,
            rating: rating.map(|r| r.value()),
            is_featured: draft.is_featured,
            display_order: draft.display_order,
            is_active: draft.is_active,
        })
    }
}

#[async_trait]
impl TestimonialService for SeaOrmTestimonialService {
    async fn list_public(
        &self,
        featured_only: bool,
    ) -> Result<Vec<testimonials::Model>, TestimonialError> {
        Ok(self.store.testimonials().list_active(featured_only).await?)
    }

    async fn list_all(&self) -> Result<Vec<testimonials::Model>, TestimonialError> {
        Ok(self.store.testimonials().list_all().await?)
    }

    async fn get(&self, id: i32) -> Result<testimonials::Model, TestimonialError> {
        self.store
            .testimonials()
            .get(id)
            .await?
            .ok_or(TestimonialError::NotFound(id))
    }

    async fn create(
        &self,
        draft: TestimonialDraft,
    ) -> Result<testimonials::Model, TestimonialError> {
        let testimonial = Self::validate_new(draft)?;
        Ok(self.store.testimonials().create(testimonial).await?)
    }

    async fn update(
        &self,
        id: i32,
        draft: TestimonialDraft,
    ) -> Result<testimonials::Model, TestimonialError> {
        let changes = Self::validate_changes(draft)?;
        self.store
            .testimonials()
            .update(id, changes)
            .await?
            .ok_or(TestimonialError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), TestimonialError> {
        let image = self
            .store
            .testimonials()
            .delete(id)
            .await?
            .ok_or(TestimonialError::NotFound(id))?;

        self.uploads.delete_if_some(image).await;
        Ok(())
    }

    async fn toggle_active(&self, id: i32) -> Result<testimonials::Model, TestimonialError> {
        self.store
            .testimonials()
            .toggle_active(id)
            .await?
            .ok_or(TestimonialError::NotFound(id))
    }

    async fn toggle_featured(&self, id: i32) -> Result<testimonials::Model, TestimonialError> {
        self.store
            .testimonials()
            .toggle_featured(id)
            .await?
            .ok_or(TestimonialError::NotFound(id))
    }

    async fn set_display_order(
        &self,
        id: i32,
        display_order: i32,
    ) -> Result<testimonials::Model, TestimonialError> {
        self.store
            .testimonials()
            .set_display_order(id, display_order)
            .await?
            .ok_or(TestimonialError::NotFound(id))
    }

    async fn set_image(
        &self,
        id: i32,
        upload: ImageUpload,
    ) -> Result<testimonials::Model, TestimonialError> {
        let repo = self.store.testimonials();
        self.uploads
            .replace(&upload, |filename| async move {
                repo.set_image(id, Some(filename)).await
            })
            .await?
            .ok_or(TestimonialError::NotFound(id))?;

        self.get(id).await
    }

    async fn remove_image(&self, id: i32) -> Result<testimonials::Model, TestimonialError> {
        let previous = self
            .store
            .testimonials()
            .set_image(id, None)
            .await?
            .ok_or(TestimonialError::NotFound(id))?;

        self.uploads.delete_if_some(previous).await;
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_testimonial_defaults() {
        let draft = TestimonialDraft {
            customer_name: Some("ليلى".to_string()),
            testimonial_text: Some("عمل متقن".to_string()),
            ..Default::default()
        };
        let testimonial = SeaOrmTestimonialService::validate_new(draft).unwrap();
        assert_eq!(testimonial.rating, 5);
        assert_eq!(testimonial.display_order, 0);
        assert!(testimonial.is_active);
        assert!(!testimonial.is_featured);
        assert_eq!(testimonial.customer_title, None);
    }

    #[test]
    fn new_testimonial_requires_text() {
        let draft = TestimonialDraft {
            customer_name: Some("ليلى".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            SeaOrmTestimonialService::validate_new(draft),
            Err(TestimonialError::Validation(_))
        ));
    }

    #[test]
    fn update_rejects_bad_rating_and_clears_title() {
        let bad = TestimonialDraft {
            rating: Some(0),
            ..Default::default()
        };
        assert!(SeaOrmTestimonialService::validate_changes(bad).is_err());

        let clear = TestimonialDraft {
            customer_title: Some(String::new()),
            ..Default::default()
        };
        let changes = SeaOrmTestimonialService::validate_changes(clear).unwrap();
        assert_eq!(changes.customer_title, Some(None));
    }
}
