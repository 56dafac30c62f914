// stock-server/tests/api_auth.rs
// 认证与用户管理集成测试

mod common;

use common::{ADMIN_PASS, ADMIN_USER, NORTH, TestApp};
use http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(Method::GET, &format!("/api/products?branch={NORTH}"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, body) = app.get("/api/dashboard", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": ADMIN_USER, "password": ADMIN_PASS })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "Admin");
    assert!(body["user"].get("branch").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], ADMIN_USER);
}

#[tokio::test]
async fn test_login_failure_is_unified() {
    let app = TestApp::new().await;

    let (status, wrong_pw) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": ADMIN_USER, "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, no_user) = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "ghost", "password": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, no_user);
    assert_eq!(no_user["code"], 1002);
}

#[tokio::test]
async fn test_self_registration_is_forced_to_user() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "eve", "password": "password1", "role": "Admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "User");
    assert!(body.get("passwordHash").is_none());

    let token = app.login("eve", "password1").await;
    let (status, body) = app.get("/api/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "eve", "password": "password2" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8002);
    assert_eq!(body["message"], "Username already exists");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new().await;
    let (status, body) = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "username": "bob", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8005);
}

#[tokio::test]
async fn test_admin_user_management() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "lee", "password": "password1", "role": "Wizard" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8004);

    let (status, created) = app
        .post(
            "/api/users",
            &admin,
            json!({ "username": "lee", "password": "password1", "role": "Manager-Luzon-Main" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "Manager-Luzon-Main");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(&format!("/api/users/{id}"), &admin, json!({ "role": "Staff-North Branch" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "Staff-North Branch");
    assert_eq!(updated["username"], "lee");

    let token = app.login("lee", "password1").await;
    let (_, me) = app.get("/api/auth/me", &token).await;
    assert_eq!(me["branch"], "North Branch");

    let (_, list) = app.get("/api/users", &admin).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, _) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, me) = app.get("/api/auth/me", &admin).await;
    let id = me["id"].as_i64().unwrap();

    let (status, body) = app.delete(&format!("/api/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 8003);
}

#[tokio::test]
async fn test_branches_are_scoped_for_staff() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, all) = app.get("/api/branches", &admin).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let staff = app.user_token("maria", "Staff-North Branch").await;
    let (_, mine) = app.get("/api/branches", &staff).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["name"], "North Branch");
    assert_eq!(mine[0]["key"], "northbranch");
}
