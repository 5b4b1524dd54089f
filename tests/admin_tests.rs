//! Back-office flows: auth, moderation, uploads and settings.

mod common;

use axum::http::StatusCode;
use common::{body_json, json_request, multipart_request, spawn_app};

async fn submit_review(app: &common::TestApp, name: &str) -> i64 {
    let response = app
        .send(json_request(
            "POST",
            "/api/reviews",
            None,
            &serde_json::json!({
                "customer_name": name,
                "comment": "Great piece",
                "rating": 4
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let app = spawn_app("unauthorized").await;

    for uri in [
        "/api/admin/dashboard",
        "/api/admin/products",
        "/api/admin/settings",
        "/api/auth/me",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "GET {uri}");
    }

    let response = app
        .send(json_request(
            "POST",
            "/api/auth/login",
            None,
            &serde_json::json!({ "username": "admin", "password": "wrong" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_me_and_logout() {
    let app = spawn_app("login").await;
    let cookie = app.login().await;

    let me = app.get_json("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me["data"]["username"], common::ADMIN_USERNAME);

    let response = app.post_empty("/api/auth/logout", &cookie).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn featuring_requires_approval_and_reject_clears_it() {
    let app = spawn_app("featured").await;
    let cookie = app.login().await;
    let id = submit_review(&app, "Layla").await;

    let response = app
        .post_empty(&format!("/api/admin/reviews/{id}/toggle-featured"), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.post_empty(&format!("/api/admin/reviews/{id}/approve"), &cookie)
        .await;
    let response = app
        .post_empty(&format!("/api/admin/reviews/{id}/toggle-featured"), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "featured");

    let featured = app.get_json("/api/reviews/featured", None).await;
    assert_eq!(featured["data"].as_array().unwrap().len(), 1);

    let response = app
        .post_empty(&format!("/api/admin/reviews/{id}/reject"), &cookie)
        .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["is_featured"], false);

    let featured = app.get_json("/api/reviews/featured", None).await;
    assert!(featured["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn review_status_filter_and_bulk_moderation() {
    let app = spawn_app("bulk").await;
    let cookie = app.login().await;

    let a = submit_review(&app, "A").await;
    let b = submit_review(&app, "B").await;
    let c = submit_review(&app, "C").await;

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/reviews/bulk",
            Some(&cookie),
            &serde_json::json!({ "action": "approve", "ids": [a, b] }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["affected"], 2);

    let pending = app
        .get_json("/api/admin/reviews?status=pending", Some(&cookie))
        .await;
    let pending_ids: Vec<i64> = pending["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(pending_ids, vec![c]);

    let response = app.get("/api/admin/reviews?status=bogus", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/reviews/bulk",
            Some(&cookie),
            &serde_json::json!({ "action": "delete", "ids": [a, b, c] }),
        ))
        .await;
    assert_eq!(body_json(response).await["data"]["affected"], 3);

    let all = app.get_json("/api/admin/reviews", Some(&cookie)).await;
    assert!(all["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn product_image_is_stored_replaced_and_removed_with_the_row() {
    let app = spawn_app("product-image").await;
    let cookie = app.login().await;

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/products",
            Some(&cookie),
            &serde_json::json!({ "name": "Bowl", "price": 30.0 }),
        ))
        .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/admin/products/{id}/image");

    let response = app
        .send(multipart_request("PUT", &uri, &cookie, "bowl.png", b"first"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await["data"]["image_filename"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(first.ends_with("_bowl.png"));
    assert!(app.uploads_dir.join(&first).exists());

    let response = app
        .send(multipart_request("PUT", &uri, &cookie, "bowl.png", b"second"))
        .await;
    let second = body_json(response).await["data"]["image_filename"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(first, second);
    assert!(!app.uploads_dir.join(&first).exists());
    assert_eq!(std::fs::read(app.uploads_dir.join(&second)).unwrap(), b"second");

    let response = app
        .send(multipart_request("PUT", &uri, &cookie, "notes.txt", b"text"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(json_request(
            "DELETE",
            &format!("/api/admin/products/{id}"),
            Some(&cookie),
            &serde_json::json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!app.uploads_dir.join(&second).exists());

    let response = app
        .get(&format!("/api/admin/products/{id}"), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_testimonial_without_image_only_removes_the_row() {
    let app = spawn_app("testimonial-delete").await;
    let cookie = app.login().await;

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/testimonials",
            Some(&cookie),
            &serde_json::json!({
                "customer_name": "Huda",
                "testimonial_text": "Exactly what I ordered"
            }),
        ))
        .await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = app
        .send(json_request(
            "DELETE",
            &format!("/api/admin/testimonials/{id}"),
            Some(&cookie),
            &serde_json::json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .get(&format!("/api/admin/testimonials/{id}"), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_settings_update_changes_nothing() {
    let app = spawn_app("settings-invalid").await;
    let cookie = app.login().await;

    let before = app.get_json("/api/admin/settings", Some(&cookie)).await;

    let response = app
        .send(json_request(
            "PUT",
            "/api/admin/settings",
            Some(&cookie),
            &serde_json::json!({
                "site_name": "Renamed shop",
                "background_color": "not-a-color"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let after = app.get_json("/api/admin/settings", Some(&cookie)).await;
    assert_eq!(before["data"], after["data"]);

    let response = app
        .send(json_request(
            "PUT",
            "/api/admin/settings",
            Some(&cookie),
            &serde_json::json!({
                "site_name": "Renamed shop",
                "whatsapp_number": "+966 55 123 4567"
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let site = app.get_json("/api/site", None).await;
    assert_eq!(site["data"]["settings"]["site_name"], "Renamed shop");
    let contact = site["data"]["whatsapp"]["contact"].as_str().unwrap();
    assert!(contact.starts_with("https://wa.me/966551234567?text="));
}

#[tokio::test]
async fn analytics_tolerate_empty_tables() {
    let app = spawn_app("analytics").await;
    let cookie = app.login().await;

    let body = app.get_json("/api/admin/analytics", Some(&cookie)).await;
    assert_eq!(body["data"]["products"]["total"], 0);
    assert_eq!(body["data"]["reviews"]["average_rating"], 0.0);
    assert_eq!(
        body["data"]["reviews"]["rating_distribution"],
        serde_json::json!([0, 0, 0, 0, 0])
    );
    assert!(body["data"]["categories"].as_array().unwrap().is_empty());

    let dashboard = app.get_json("/api/admin/dashboard", Some(&cookie)).await;
    assert_eq!(dashboard["data"]["total_products"], 0);
    assert!(dashboard["data"]["recent_reviews"].as_array().unwrap().is_empty());
}

async fn create(app: &common::TestApp, cookie: &str, uri: &str, body: serde_json::Value) -> i64 {
    let response = app
        .send(json_request("POST", uri, Some(cookie), &body))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED, "POST {uri}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn delete(app: &common::TestApp, cookie: &str, uri: &str) -> serde_json::Value {
    let response = app
        .send(json_request("DELETE", uri, Some(cookie), &serde_json::json!({})))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "DELETE {uri}");
    body_json(response).await
}

/// Uploads `filename` to `uri` and returns the stored name found under `field`.
async fn upload(
    app: &common::TestApp,
    cookie: &str,
    uri: &str,
    field: &str,
    filename: &str,
) -> String {
    let response = app
        .send(multipart_request("PUT", uri, cookie, filename, b"image-bytes"))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "PUT {uri}");
    let stored = body_json(response).await["data"][field]
        .as_str()
        .unwrap()
        .to_string();
    assert!(app.uploads_dir.join(&stored).exists());
    stored
}

#[tokio::test]
async fn review_and_testimonial_images_are_removed_with_their_rows() {
    let app = spawn_app("owned-images").await;
    let cookie = app.login().await;

    let review = create(
        &app,
        &cookie,
        "/api/admin/reviews",
        serde_json::json!({ "customer_name": "Rana", "comment": "Lovely" }),
    )
    .await;
    let testimonial = create(
        &app,
        &cookie,
        "/api/admin/testimonials",
        serde_json::json!({ "customer_name": "Mona", "testimonial_text": "Beautiful work" }),
    )
    .await;

    for base in [
        format!("/api/admin/reviews/{review}"),
        format!("/api/admin/testimonials/{testimonial}"),
    ] {
        let stored = upload(
            &app,
            &cookie,
            &format!("{base}/image"),
            "image_filename",
            "photo.jpg",
        )
        .await;

        delete(&app, &cookie, &base).await;

        assert!(!app.uploads_dir.join(&stored).exists(), "{base}");
        let response = app.get(&base, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn image_endpoints_detach_the_file_but_keep_the_row() {
    let app = spawn_app("detach-images").await;
    let cookie = app.login().await;

    let product = create(
        &app,
        &cookie,
        "/api/admin/products",
        serde_json::json!({ "name": "Coaster", "price": 8.0 }),
    )
    .await;
    let review = create(
        &app,
        &cookie,
        "/api/admin/reviews",
        serde_json::json!({ "customer_name": "Dana", "comment": "Cute" }),
    )
    .await;
    let testimonial = create(
        &app,
        &cookie,
        "/api/admin/testimonials",
        serde_json::json!({ "customer_name": "Salma", "testimonial_text": "Fast delivery" }),
    )
    .await;

    for base in [
        format!("/api/admin/products/{product}"),
        format!("/api/admin/reviews/{review}"),
        format!("/api/admin/testimonials/{testimonial}"),
    ] {
        let image_uri = format!("{base}/image");
        let stored = upload(&app, &cookie, &image_uri, "image_filename", "pic.webp").await;

        let body = delete(&app, &cookie, &image_uri).await;
        assert!(body["data"]["image_filename"].is_null(), "{image_uri}");
        assert!(body["data"]["image_url"].is_null());
        assert!(!app.uploads_dir.join(&stored).exists());

        // Removing an image that is already gone is a no-op.
        let body = delete(&app, &cookie, &image_uri).await;
        assert!(body["data"]["image_filename"].is_null());

        let row = app.get_json(&base, Some(&cookie)).await;
        assert!(row["data"]["image_filename"].is_null());
    }

    let response = app
        .send(json_request(
            "DELETE",
            "/api/admin/products/9999/image",
            Some(&cookie),
            &serde_json::json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_delete_removes_review_images() {
    let app = spawn_app("bulk-delete-images").await;
    let cookie = app.login().await;

    let mut ids = Vec::new();
    let mut files = Vec::new();
    for name in ["Aya", "Reem"] {
        let id = submit_review(&app, name).await;
        files.push(
            upload(
                &app,
                &cookie,
                &format!("/api/admin/reviews/{id}/image"),
                "image_filename",
                "review.png",
            )
            .await,
        );
        ids.push(id);
    }
    let kept = submit_review(&app, "Lina").await;

    let response = app
        .send(json_request(
            "POST",
            "/api/admin/reviews/bulk",
            Some(&cookie),
            &serde_json::json!({ "action": "delete", "ids": ids }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["affected"], 2);

    for file in &files {
        assert!(!app.uploads_dir.join(file).exists(), "{file}");
    }
    let response = app
        .get(&format!("/api/admin/reviews/{kept}"), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn settings_logo_and_hero_image_are_replaced_and_removed() {
    let app = spawn_app("settings-images").await;
    let cookie = app.login().await;

    for (slot, field) in [("logo", "logo_filename"), ("hero-image", "hero_image_filename")] {
        let uri = format!("/api/admin/settings/{slot}");

        let first = upload(&app, &cookie, &uri, field, "brand.png").await;
        let second = upload(&app, &cookie, &uri, field, "brand.png").await;
        assert_ne!(first, second);
        assert!(!app.uploads_dir.join(&first).exists(), "{slot}");

        let settings = app.get_json("/api/admin/settings", Some(&cookie)).await;
        assert_eq!(settings["data"][field], second.as_str());

        let body = delete(&app, &cookie, &uri).await;
        assert!(body["data"][field].is_null());
        assert!(!app.uploads_dir.join(&second).exists());
    }

    let response = app
        .send(multipart_request(
            "PUT",
            "/api/admin/settings/logo",
            &cookie,
            "logo.exe",
            b"nope",
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let settings = app.get_json("/api/admin/settings", Some(&cookie)).await;
    assert!(settings["data"]["logo_filename"].is_null());
}

#[tokio::test]
async fn deleting_a_product_without_image_only_removes_the_row() {
    let app = spawn_app("product-delete").await;
    let cookie = app.login().await;

    let id = create(
        &app,
        &cookie,
        "/api/admin/products",
        serde_json::json!({ "name": "Keychain", "price": 5.0 }),
    )
    .await;

    delete(&app, &cookie, &format!("/api/admin/products/{id}")).await;

    let response = app
        .get(&format!("/api/admin/products/{id}"), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(&app.uploads_dir).unwrap().count(), 0);
}
