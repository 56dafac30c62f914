// stock-server/tests/api_activity_log.rs
// 操作日志集成测试

mod common;

use common::{NORTH, TestApp, rice};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_operations_are_logged_newest_first() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_product(&admin, NORTH, rice()).await;
    app.post(&format!("/api/inventory/reset?branch={NORTH}"), &admin, json!({}))
        .await;

    let (status, entries) = app.get("/api/activity-log", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<&str> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(
        actions,
        vec![
            "Submitted inventory for North Branch (1 items)",
            "Added product Rice (North Branch)",
            "Logged in",
        ]
    );
    assert_eq!(entries[0]["username"], "admin");
    assert_eq!(entries[0]["role"], "Admin");
}

#[tokio::test]
async fn test_append_takes_identity_from_token() {
    let app = TestApp::new().await;
    let staff = app.user_token("maria", "Staff-North Branch").await;

    let (status, entry) = app
        .post(
            "/api/activity-log",
            &staff,
            json!({ "action": "Counted freezer", "username": "admin", "role": "Admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["username"], "maria");
    assert_eq!(entry["role"], "Staff-North Branch");
    assert_eq!(entry["action"], "Counted freezer");

    let (status, body) = app
        .post("/api/activity-log", &staff, json!({ "action": " " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn test_clear_is_admin_only() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let staff = app.user_token("maria", "Staff-North Branch").await;

    let (status, body) = app.delete("/api/activity-log", &staff).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (_, before) = app.get("/api/activity-log", &admin).await;
    let count = before.as_array().unwrap().len() as u64;
    assert!(count > 0);

    let (status, cleared) = app.delete("/api/activity-log", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["removed"], count);

    let (_, after) = app.get("/api/activity-log", &admin).await;
    assert!(after.as_array().unwrap().is_empty());
}
