//! Shared harness: the full router over an in-memory store

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use orderdesk_server::db::MemorySessionProvider;
use orderdesk_server::http::{build_router, AppState, REQUEST_ID_HEADER};

pub struct TestApp {
    pub router: Router,
    pub store: MemorySessionProvider,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: String,
    pub raw: String,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_sleep_interval(orderdesk_server::http::DEFAULT_SLEEP_INTERVAL)
    }

    pub fn with_sleep_interval(interval: Duration) -> Self {
        let store = MemorySessionProvider::new();
        let state = AppState::new(Arc::new(store.clone())).with_sleep_interval(interval);
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty(), None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(
            Method::POST,
            uri,
            Body::from(body.to_string()),
            Some("application/json"),
        )
        .await
    }

    pub async fn post_raw(&self, uri: &str, body: &'static str) -> TestResponse {
        self.send(Method::POST, uri, Body::from(body), Some("application/json"))
            .await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Body,
        content_type: Option<&str>,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            request = request.header("content-type", content_type);
        }
        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let request_id = response
            .headers()
            .get(&REQUEST_ID_HEADER)
            .expect("every response carries x-request-id")
            .to_str()
            .unwrap()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let raw = String::from_utf8(bytes.to_vec()).unwrap();
        let body = serde_json::from_str(&raw).unwrap_or(Value::Null);

        TestResponse {
            status,
            request_id,
            raw,
            body,
        }
    }

    /// Create a user and return its id.
    pub async fn create_user(&self, username: &str) -> i64 {
        let response = self
            .post_json(
                "/users/",
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "pass",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["id"].as_i64().unwrap()
    }
}
