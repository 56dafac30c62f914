// stock-server/tests/common/mod.rs
// 集成测试公共工具: 临时数据库 + 完整路由

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use stock_server::Config;
use stock_server::ServerState;
use stock_server::core::build_router;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin-pass";

pub const NORTH: &str = "North%20Branch";
pub const SOUTH: &str = "South%20Branch";

pub struct TestApp {
    _dir: TempDir,
    pub state: ServerState,
    router: Router,
}

impl TestApp {
    /// Fresh database with two branches and a seeded admin
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = Config::with_overrides(
            dir.path().to_string_lossy().to_string(),
            0,
            &["North Branch", "South Branch"],
        )
        .unwrap();
        config.auth_delay_ms = 0;
        config.admin_username = Some(ADMIN_USER.to_string());
        config.admin_password = Some(ADMIN_PASS.to_string());
        config.log_dir = None;

        let state = ServerState::initialize(&config).await.unwrap();
        let router = build_router(state.clone());
        Self {
            _dir: dir,
            state,
            router,
        }
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
            builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
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

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USER, ADMIN_PASS).await
    }

    /// Create an account through the admin API and log in as it
    pub async fn user_token(&self, username: &str, role: &str) -> String {
        let admin = self.admin_token().await;
        let (status, body) = self
            .post(
                "/api/users",
                &admin,
                json!({ "username": username, "password": "password1", "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        self.login(username, "password1").await
    }

    /// Create a product as `token` and return the response body
    pub async fn create_product(&self, token: &str, branch: &str, body: Value) -> Value {
        let (status, body) = self
            .post(&format!("/api/products?branch={branch}"), token, body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
        body
    }
}

/// The {10, 5, 2, 1, 0} rice line used across tests
pub fn rice() -> Value {
    json!({
        "name": "Rice",
        "category": "Dry Goods",
        "price": 42.5,
        "begInventory": 10,
        "delivered": 5,
        "waste": 2,
        "use": 1,
        "withdrawal": 0
    })
}
