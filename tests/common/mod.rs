//! Shared fixtures for router-level tests.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use claystore::config::Config;
use http_body_util::BodyExt;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Credentials seeded by the admin migration.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub struct TestApp {
    pub state: Arc<claystore::api::AppState>,
    pub router: Router,
    pub uploads_dir: PathBuf,
}

pub fn test_config(name: &str) -> (Config, PathBuf) {
    let run_id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("claystore-{name}-{run_id}.db"));
    let uploads_dir = std::env::temp_dir().join(format!("claystore-{name}-uploads-{run_id}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.uploads.path = uploads_dir.display().to_string();
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;

    (config, uploads_dir)
}

pub async fn spawn_app(name: &str) -> TestApp {
    let (config, uploads_dir) = test_config(name);

    std::fs::create_dir_all(&uploads_dir).expect("failed to create uploads dir");

    let state = claystore::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");

    let router = claystore::api::router(state.clone());
    TestApp {
        state,
        router,
        uploads_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    /// Logs in as the bootstrap admin and returns the session cookie.
    pub async fn login(&self) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                &serde_json::json!({
                    "username": ADMIN_USERNAME,
                    "password": ADMIN_PASSWORD,
                }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login must set a session cookie")
            .to_str()
            .unwrap();

        cookie.split(';').next().unwrap().to_string()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn get_json(&self, uri: &str, cookie: Option<&str>) -> serde_json::Value {
        let response = self.get(uri, cookie).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        body_json(response).await
    }

    pub async fn post_empty(&self, uri: &str, cookie: &str) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn multipart_request(
    method: &str,
    uri: &str,
    cookie: &str,
    filename: &str,
    bytes: &[u8],
) -> Request<Body> {
    const BOUNDARY: &str = "claystore-test-boundary";

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
