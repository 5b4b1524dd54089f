//! Persistence-level guarantees.

mod common;

use claystore::db::Store;
use claystore::services::{BulkAction, ReviewDraft, ReviewError};

#[tokio::test]
async fn concurrent_first_access_creates_one_settings_row() {
    let (config, _) = common::test_config("settings-race");
    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open store");

    let reads = (0..8).map(|_| {
        let store = store.clone();
        async move { store.settings().get_or_create().await }
    });
    let results = futures::future::join_all(reads).await;

    for settings in results {
        let settings = settings.expect("get_or_create failed");
        assert_eq!(settings.id, claystore::entities::site_settings::SINGLETON_ID);
    }
    assert_eq!(store.settings().count().await.unwrap(), 1);
}

#[tokio::test]
async fn settings_update_refreshes_timestamp() {
    let (config, _) = common::test_config("settings-update");
    let store = Store::new(&config.general.database_path).await.unwrap();

    let before = store.settings().get_or_create().await.unwrap();
    let after = store
        .settings()
        .update(claystore::db::SettingsChanges {
            footer_text: Some("Handmade with care".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(after.footer_text, "Handmade with care");
    assert_eq!(after.site_name, before.site_name);
    assert!(after.updated_at > before.updated_at);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reject_and_feature_never_lose_the_reject() {
    let app = common::spawn_app("moderation-race").await;
    let reviews = app.state.review_service().clone();

    for _ in 0..50 {
        let review = reviews
            .create(ReviewDraft {
                customer_name: Some("ليلى".to_string()),
                comment: Some("قطعة جميلة".to_string()),
                rating: Some(5),
                is_approved: true,
                ..Default::default()
            })
            .await
            .unwrap();
        let id = review.id;

        let reject = tokio::spawn({
            let reviews = reviews.clone();
            async move { reviews.reject(id).await }
        });
        let feature = tokio::spawn({
            let reviews = reviews.clone();
            async move { reviews.toggle_feature(id).await }
        });
        let (reject, feature) = tokio::join!(reject, feature);

        reject.unwrap().expect("reject must succeed");
        // Featuring after the reject is refused; before it, the reject clears it.
        if let Err(err) = feature.unwrap() {
            assert!(matches!(err, ReviewError::Moderation(_)), "{err}");
        }

        let stored = reviews.get(id).await.unwrap();
        assert!(!stored.is_approved, "review {id} still public");
        assert!(!stored.is_featured);
    }
}

#[tokio::test]
async fn bulk_approve_keeps_featured_reviews_featured() {
    let app = common::spawn_app("bulk-approve").await;
    let reviews = app.state.review_service();

    let draft = ReviewDraft {
        customer_name: Some("Nour".to_string()),
        comment: Some("Lovely earrings".to_string()),
        ..Default::default()
    };
    let featured = reviews
        .create(ReviewDraft {
            is_approved: true,
            ..draft.clone()
        })
        .await
        .unwrap();
    reviews.toggle_feature(featured.id).await.unwrap();
    let pending = reviews.create(draft).await.unwrap();

    let affected = reviews
        .bulk(BulkAction::Approve, &[featured.id, pending.id])
        .await
        .unwrap();

    assert_eq!(affected, 1);
    let featured = reviews.get(featured.id).await.unwrap();
    assert!(featured.is_approved && featured.is_featured);
    assert!(reviews.get(pending.id).await.unwrap().is_approved);
}
