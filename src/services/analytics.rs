//! Storefront analytics, computed on every request.

use crate::constants::limits::RECENT_ITEMS;
use crate::db::{ProductCounts, ReviewCounts, Store, TestimonialCounts};
use crate::domain::Rating;
use crate::entities::{products, reviews};
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProductStats {
    pub total: u64,
    pub active: u64,
    pub featured: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewStats {
    pub total: u64,
    pub approved: u64,
    pub pending: u64,
    pub featured: u64,
    pub average_rating: f64,
    /// Approved review count per star, index 0 is one star.
    pub rating_distribution: [u64; 5],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestimonialStats {
    pub total: u64,
    pub active: u64,
    pub featured: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub products: ProductStats,
    pub reviews: ReviewStats,
    pub testimonials: TestimonialStats,
    pub categories: Vec<CategoryCount>,
}

/// Public rating summary shown next to the review list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: u64,
    pub average_rating: f64,
    pub rating_distribution: [u64; 5],
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub total_products: u64,
    pub approved_reviews: u64,
    pub pending_reviews: u64,
    pub recent_products: Vec<products::Model>,
    pub recent_reviews: Vec<reviews::Model>,
}

/// Mean and per-star distribution of the given ratings.
///
/// Ratings outside 1-5 are ignored; an empty input averages to 0.
#[must_use]
pub fn summarize_ratings(ratings: &[i32]) -> RatingSummary {
    let mut distribution = [0_u64; 5];
    let mut sum = 0_i64;
    let mut count = 0_u64;

    for &rating in ratings {
        let Ok(rating) = Rating::try_from(rating) else {
            continue;
        };
        let Ok(slot) = usize::try_from(rating.value() - Rating::MIN) else {
            continue;
        };
        distribution[slot] += 1;
        sum += i64::from(rating.value());
        count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    let average_rating = if count == 0 {
        0.0
    } else {
        round_to_tenths(sum as f64 / count as f64)
    };

    RatingSummary {
        count,
        average_rating,
        rating_distribution: distribution,
    }
}

fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Counts products per category, skipping blank ones.
///
/// Sorted by count descending, then name ascending.
#[must_use]
pub fn category_breakdown(categories: &[Option<String>]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for category in categories.iter().flatten() {
        let category = category.trim();
        if category.is_empty() {
            continue;
        }
        *counts.entry(category).or_default() += 1;
    }

    let mut breakdown: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    breakdown
}

#[must_use]
pub fn build_snapshot(
    products: ProductCounts,
    reviews: ReviewCounts,
    testimonials: TestimonialCounts,
    approved_ratings: &[i32],
    categories: &[Option<String>],
) -> AnalyticsSnapshot {
    let ratings = summarize_ratings(approved_ratings);

    AnalyticsSnapshot {
        products: ProductStats {
            total: products.total,
            active: products.active,
            featured: products.featured,
        },
        reviews: ReviewStats {
            total: reviews.total,
            approved: reviews.approved,
            pending: reviews.pending,
            featured: reviews.featured,
            average_rating: ratings.average_rating,
            rating_distribution: ratings.rating_distribution,
        },
        testimonials: TestimonialStats {
            total: testimonials.total,
            active: testimonials.active,
            featured: testimonials.featured,
        },
        categories: category_breakdown(categories),
    }
}

pub struct AnalyticsService {
    store: Store,
}

impl AnalyticsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn snapshot(&self) -> Result<AnalyticsSnapshot> {
        let repo = self.store.analytics();

        let (products, reviews, testimonials, ratings, categories) = futures::try_join!(
            repo.product_counts(),
            repo.review_counts(),
            repo.testimonial_counts(),
            repo.approved_ratings(),
            repo.active_product_categories(),
        )?;

        Ok(build_snapshot(
            products,
            reviews,
            testimonials,
            &ratings,
            &categories,
        ))
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let analytics = self.store.analytics();
        let products_repo = self.store.products();
        let reviews_repo = self.store.reviews();

        let (products, reviews, recent_products, recent_reviews) = futures::try_join!(
            analytics.product_counts(),
            analytics.review_counts(),
            products_repo.recent(RECENT_ITEMS),
            reviews_repo.recent(RECENT_ITEMS),
        )?;

        Ok(Dashboard {
            total_products: products.total,
            approved_reviews: reviews.approved,
            pending_reviews: reviews.pending,
            recent_products,
            recent_reviews,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ratings_average_to_zero() {
        let summary = summarize_ratings(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.average_rating.abs() < f64::EPSILON);
        assert_eq!(summary.rating_distribution, [0; 5]);
    }

    #[test]
    fn ratings_are_averaged_and_bucketed() {
        let summary = summarize_ratings(&[5, 4, 4, 1]);
        assert_eq!(summary.count, 4);
        assert!((summary.average_rating - 3.5).abs() < f64::EPSILON);
        assert_eq!(summary.rating_distribution, [1, 0, 0, 2, 1]);
    }

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let summary = summarize_ratings(&[5, 4, 4]);
        assert!((summary.average_rating - 4.3).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_ratings_are_skipped() {
        let summary = summarize_ratings(&[0, 6, 3]);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.rating_distribution, [0, 0, 1, 0, 0]);
    }

    #[test]
    fn categories_skip_blanks_and_sort_by_count() {
        let categories = vec![
            Some("أكواب".to_string()),
            Some("إكسسوارات".to_string()),
            Some("أكواب".to_string()),
            Some("   ".to_string()),
            None,
            Some("ديكور".to_string()),
        ];

        let breakdown = category_breakdown(&categories);
        assert_eq!(breakdown.len(), 3);
        assert_eq!(breakdown[0].category, "أكواب");
        assert_eq!(breakdown[0].count, 2);
        assert!(breakdown[1].category < breakdown[2].category);
    }

    #[test]
    fn snapshot_tolerates_empty_tables() {
        let snapshot = build_snapshot(
            ProductCounts::default(),
            ReviewCounts::default(),
            TestimonialCounts::default(),
            &[],
            &[],
        );
        assert_eq!(snapshot, AnalyticsSnapshot::default());
    }
}
