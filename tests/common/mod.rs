#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use inventory_api::{
    build_router,
    models::{ItemFields, SupplierFields},
    AppState, InventoryStore, MemoryStore,
};
use serde_json::Value;
use tower::ServiceExt;

/// One item, one supplier linked to it, one token for `testuser`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub token: String,
    pub item_id: i64,
    pub supplier_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let token = store.issue_token("testuser").await.unwrap();

        let item = store
            .insert_item(&ItemFields {
                name: "Test Item".to_string(),
                description: Some("This is a test item".to_string()),
                price: "10.99".parse().unwrap(),
            })
            .await
            .unwrap();
        let supplier = store
            .insert_supplier(&SupplierFields {
                name: "Test Supplier".to_string(),
                contact_information: Some("123 Test St".to_string()),
                items: vec![item.id],
            })
            .await
            .unwrap();

        let router = build_router(AppState::new(store.clone()));

        Self {
            router,
            store,
            token: token.key,
            item_id: item.id,
            supplier_id: supplier.id,
        }
    }

    /// Authenticated request.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let authorization = format!("Token {}", self.token);
        self.send_with(method, uri, body, Some(&authorization)).await
    }

    pub async fn send_with(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.dispatch(request).await
    }

    /// Authenticated request with a body sent byte for byte.
    pub async fn send_raw(&self, method: Method, uri: &str, raw: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Token {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw.to_string()))
            .unwrap();
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to get response");
        let status = response.status();

        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Failed to parse JSON")
        };

        (status, value)
    }
}
