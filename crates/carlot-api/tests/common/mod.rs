#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use carlot_api::password::PasswordConfig;
use carlot_api::token::TokenConfig;
use carlot_api::{AppStateInner, router};
use carlot_db::Database;

pub const SECRET: &str = "integration-test-secret";

/// The full router over a private in-memory database.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("in-memory database");
        let state = AppStateInner::new(
            db,
            &TokenConfig {
                secret: SECRET.to_string(),
                ttl: chrono::Duration::hours(1),
            },
            // Keep hashing cheap; the tests exercise the flow, not the cost
            &PasswordConfig {
                memory_kib: 1024,
                iterations: 1,
            },
        )
        .expect("app state");

        Self {
            router: router(state),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, name: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "name": name, "password": password })),
        )
        .await
    }

    pub async fn login(&self, name: &str, password: &str) -> (StatusCode, Value) {
        self.request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "name": name, "password": password })),
        )
        .await
    }

    /// Register `name` and return (user id, token).
    pub async fn user(&self, name: &str) -> (i64, String) {
        let (status, body) = self.register(name, "secret1").await;
        assert_eq!(status, StatusCode::CREATED, "register {}: {}", name, body);
        (
            body["user"]["id"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Create a bare listing and return its id.
    pub async fn listing(&self, token: &str, name: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/listings",
                token,
                json!({
                    "name": name,
                    "price": 120000,
                    "link": "https://example.com/ads/1",
                    "imageLink": "https://example.com/ads/1.jpg",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create listing: {}", body);
        body["id"].as_i64().unwrap()
    }
}
