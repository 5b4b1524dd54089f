//! `SeaORM` implementation of the `ReviewService` trait.

use crate::constants::limits::{MAX_FEATURED_REVIEWS, NAME_MAX_LEN, PRODUCT_REVIEWS};
use crate::db::{NewReview, ReviewChanges, ReviewFilter, Store};
use crate::domain::{Rating, ReviewState, validate};
use crate::entities::reviews;
use crate::services::analytics::{RatingSummary, summarize_ratings};
use crate::services::review_service::{
    BulkAction, ReviewDraft, ReviewEdit, ReviewError, ReviewService,
};
use crate::services::uploads::{ImageUpload, UploadStore};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

const MODERATION_ATTEMPTS: usize = 8;

pub struct SeaOrmReviewService {
    store: Store,
    uploads: Arc<UploadStore>,
    featured_limit: u64,
}

/// Parses the admin `status` filter; absent means everything.
pub fn parse_filter(status: Option<&str>) -> Result<ReviewFilter, ReviewError> {
    match status.map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("" | "all") => Ok(ReviewFilter::All),
        Some("pending") => Ok(ReviewFilter::Pending),
        Some("approved") => Ok(ReviewFilter::Approved),
        Some("featured") => Ok(ReviewFilter::Featured),
        Some(other) => Err(ReviewError::Validation(format!(
            "Unknown review status '{other}'"
        ))),
    }
}

impl SeaOrmReviewService {
    #[must_use]
    pub const fn new(store: Store, uploads: Arc<UploadStore>, featured_limit: u64) -> Self {
        Self {
            store,
            uploads,
            featured_limit,
        }
    }

    fn validate_draft(draft: &ReviewDraft) -> Result<(String, String, Rating), ReviewError> {
        let name = validate::required_text(
            "Customer name",
            draft.customer_name.as_deref().unwrap_or_default(),
            NAME_MAX_LEN,
        )
        .map_err(ReviewError::Validation)?;

        let comment = validate::required_body("Comment", draft.comment.as_deref().unwrap_or_default())
            .map_err(ReviewError::Validation)?;

        let rating = Rating::from_optional(draft.rating)
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        Ok((name, comment, rating))
    }

    async fn check_product(&self, product_id: Option<i32>, active_only: bool) -> Result<(), ReviewError> {
        let Some(product_id) = product_id else {
            return Ok(());
        };

        let products = self.store.products();
        let found = if active_only {
            products.get_active(product_id).await?
        } else {
            products.get(product_id).await?
        };

        if found.is_none() {
            return Err(ReviewError::Validation(format!(
                "Product {product_id} does not exist"
            )));
        }
        Ok(())
    }

    /// Applies a moderation step as a compare-and-swap on the stored flags.
    /// A missed swap re-reads the review and re-evaluates the step.
    async fn transition(
        &self,
        id: i32,
        next: impl Fn(ReviewState) -> Result<ReviewState, ReviewError> + Send + Sync,
    ) -> Result<reviews::Model, ReviewError> {
        let repo = self.store.reviews();

        for _ in 0..MODERATION_ATTEMPTS {
            let review = self.get(id).await?;
            let flags = (review.is_approved, review.is_featured);
            let current = ReviewState::from_flags(flags.0, flags.1);
            let target = next(current)?;

            if target.flags() == flags {
                return Ok(review);
            }

            if repo.swap_state(id, flags, target).await? {
                info!(review_id = id, from = ?current, to = ?target, "Review moderated");
                return self.get(id).await;
            }
        }

        Err(ReviewError::Contended(id))
    }
}

#[async_trait]
impl ReviewService for SeaOrmReviewService {
    async fn list_public(&self) -> Result<Vec<reviews::Model>, ReviewError> {
        Ok(self.store.reviews().list_approved().await?)
    }

    async fn list_featured(&self, limit: Option<u64>) -> Result<Vec<reviews::Model>, ReviewError> {
        let limit = limit
            .unwrap_or(self.featured_limit)
            .clamp(1, MAX_FEATURED_REVIEWS);
        Ok(self.store.reviews().list_featured(limit).await?)
    }

    async fn list_for_product(
        &self,
        product_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<reviews::Model>, ReviewError> {
        let limit = limit
            .unwrap_or(PRODUCT_REVIEWS)
            .clamp(1, MAX_FEATURED_REVIEWS);
        Ok(self
            .store
            .reviews()
            .list_approved_for_product(product_id, limit)
            .await?)
    }

    async fn stats(&self) -> Result<RatingSummary, ReviewError> {
        let ratings = self.store.analytics().approved_ratings().await?;
        Ok(summarize_ratings(&ratings))
    }

    async fn submit(&self, draft: ReviewDraft) -> Result<reviews::Model, ReviewError> {
        let (customer_name, comment, rating) = Self::validate_draft(&draft)?;
        self.check_product(draft.product_id, true).await?;

        Ok(self
            .store
            .reviews()
            .create(NewReview {
                customer_name,
                comment,
                rating: rating.value(),
                product_id: draft.product_id,
                state: ReviewState::Pending,
            })
            .await?)
    }

    async fn list(&self, status: Option<&str>) -> Result<Vec<reviews::Model>, ReviewError> {
        let filter = parse_filter(status)?;
        Ok(self.store.reviews().list(filter).await?)
    }

    async fn get(&self, id: i32) -> Result<reviews::Model, ReviewError> {
        self.store
            .reviews()
            .get(id)
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    async fn create(&self, draft: ReviewDraft) -> Result<reviews::Model, ReviewError> {
        let (customer_name, comment, rating) = Self::validate_draft(&draft)?;
        self.check_product(draft.product_id, false).await?;

        let state = if draft.is_approved {
            ReviewState::Approved
        } else {
            ReviewState::Pending
        };

        Ok(self
            .store
            .reviews()
            .create(NewReview {
                customer_name,
                comment,
                rating: rating.value(),
                product_id: draft.product_id,
                state,
            })
            .await?)
    }

    async fn update(&self, id: i32, edit: ReviewEdit) -> Result<reviews::Model, ReviewError> {
        let customer_name = edit
            .customer_name
            .map(|n| validate::required_text("Customer name", &n, NAME_MAX_LEN))
            .transpose()
            .map_err(ReviewError::Validation)?;

        let comment = edit
            .comment
            .map(|c| validate::required_body("Comment", &c))
            .transpose()
            .map_err(ReviewError::Validation)?;

        let rating = edit
            .rating
            .map(Rating::try_from)
            .transpose()
            .map_err(|e| ReviewError::Validation(e.to_string()))?;

        if let Some(product_id) = edit.product_id {
            self.check_product(product_id, false).await?;
        }

        self.store
            .reviews()
            .update(
                id,
                ReviewChanges {
                    customer_name,
                    comment,
                    rating: rating.map(|r| r.value()),
                    product_id: edit.product_id,
                },
            )
            .await?
            .ok_or(ReviewError::NotFound(id))
    }

    async fn approve(&self, id: i32) -> Result<reviews::Model, ReviewError> {
        self.transition(id, |state| Ok(state.approve())).await
    }

    async fn reject(&self, id: i32) -> Result<reviews::Model, ReviewError> {
        self.transition(id, |state| Ok(state.reject())).await
    }

    async fn toggle_feature(&self, id: i32) -> Result<reviews::Model, ReviewError> {
        self.transition(id, |state| Ok(state.toggle_feature()?))
            .await
    }

    async fn delete(&self, id: i32) -> Result<(), ReviewError> {
        let image = self
            .store
            .reviews()
            .delete(id)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        self.uploads.delete_if_some(image).await;
        Ok(())
    }

    async fn bulk(&self, action: BulkAction, ids: &[i32]) -> Result<u64, ReviewError> {
        if ids.is_empty() {
            return Err(ReviewError::Validation("No reviews selected".to_string()));
        }

        let repo = self.store.reviews();
        let affected = match action {
            BulkAction::Approve => repo.approve_pending(ids).await?,
            BulkAction::Reject => repo.reject_many(ids).await?,
            BulkAction::Delete => {
                let (deleted, images) = repo.delete_many(ids).await?;
                for image in images {
                    self.uploads.delete(&image).await;
                }
                deleted
            }
        };

        Ok(affected)
    }

    async fn set_image(&self, id: i32, upload: ImageUpload) -> Result<reviews::Model, ReviewError> {
        let repo = self.store.reviews();
        self.uploads
            .replace(&upload, |filename| async move {
                repo.set_image(id, Some(filename)).await
            })
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        self.get(id).await
    }

    async fn remove_image(&self, id: i32) -> Result<reviews::Model, ReviewError> {
        let previous = self
            .store
            .reviews()
            .set_image(id, None)
            .await?
            .ok_or(ReviewError::NotFound(id))?;

        self.uploads.delete_if_some(previous).await;
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parsing() {
        assert_eq!(parse_filter(None).unwrap(), ReviewFilter::All);
        assert_eq!(parse_filter(Some("")).unwrap(), ReviewFilter::All);
        assert_eq!(parse_filter(Some("Pending")).unwrap(), ReviewFilter::Pending);
        assert_eq!(parse_filter(Some("featured")).unwrap(), ReviewFilter::Featured);
        assert!(matches!(
            parse_filter(Some("spam")),
            Err(ReviewError::Validation(_))
        ));
    }

    #[test]
    fn draft_rating_defaults_and_bounds() {
        let draft = ReviewDraft {
            customer_name: Some("سارة".to_string()),
            comment: Some("منتج رائع".to_string()),
            ..Default::default()
        };
        let (_, _, rating) = SeaOrmReviewService::validate_draft(&draft).unwrap();
        assert_eq!(rating.value(), 5);

        let out_of_range = ReviewDraft {
            rating: Some(6),
            ..draft
        };
        assert!(matches!(
            SeaOrmReviewService::validate_draft(&out_of_range),
            Err(ReviewError::Validation(_))
        ));
    }

    #[test]
    fn draft_requires_comment() {
        let draft = ReviewDraft {
            customer_name: Some("سارة".to_string()),
            comment: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(SeaOrmReviewService::validate_draft(&draft).is_err());
    }

    #[test]
    fn edit_distinguishes_null_from_absent_product() {
        let absent: ReviewEdit = serde_json::from_str(r#"{"comment":"x"}"#).unwrap();
        assert_eq!(absent.product_id, None);

        let cleared: ReviewEdit = serde_json::from_str(r#"{"product_id":null}"#).unwrap();
        assert_eq!(cleared.product_id, Some(None));

        let set: ReviewEdit = serde_json::from_str(r#"{"product_id":3}"#).unwrap();
        assert_eq!(set.product_id, Some(Some(3)));
    }
}
