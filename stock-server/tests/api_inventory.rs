// stock-server/tests/api_inventory.rs
// 库存提交与历史快照集成测试

mod common;

use common::{NORTH, SOUTH, TestApp, rice};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_submit_archives_and_rebaselines() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_product(&admin, NORTH, rice()).await;
    app.create_product(
        &admin,
        NORTH,
        json!({ "name": "Oil", "category": "Condiments", "begInventory": 4, "delivered": 2 }),
    )
    .await;

    let (status, result) = app
        .post(&format!("/api/inventory/reset?branch={NORTH}"), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{result}");
    assert_eq!(result["archived"], 2);
    assert_eq!(result["modified"], 2);
    assert_eq!(result["branch"], "North Branch");

    let (_, products) = app
        .get(&format!("/api/products?branch={NORTH}"), &admin)
        .await;
    let rice_now = &products[0];
    assert_eq!(rice_now["begInventory"], 12.0);
    assert_eq!(rice_now["delivered"], 0.0);
    assert_eq!(rice_now["waste"], 0.0);
    assert_eq!(rice_now["use"], 0.0);
    assert_eq!(rice_now["withdrawal"], 0.0);
    assert_eq!(rice_now["current"], 12.0);
    assert_eq!(products[1]["begInventory"], 6.0);

    // History round-trips regardless of the casing used to read it
    let (status, history) = app.get("/api/history?branch=north%20BRANCH", &admin).await;
    assert_eq!(status, StatusCode::OK);
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], result["historyId"]);
    assert_eq!(entries[0]["submittedBy"], "admin");

    let archived = &entries[0]["products"][0];
    assert_eq!(archived["name"], "Rice");
    assert_eq!(archived["begInventory"], 10.0);
    assert_eq!(archived["delivered"], 5.0);
    assert_eq!(archived["waste"], 2.0);
    assert_eq!(archived["use"], 1.0);
    assert_eq!(archived["withdrawal"], 0.0);
    assert_eq!(archived["current"], 12.0);
}

#[tokio::test]
async fn test_submit_empty_branch() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, result) = app
        .post(&format!("/api/inventory/reset?branch={SOUTH}"), &admin, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["archived"], 0);
    assert_eq!(result["modified"], 0);

    let id = result["historyId"].as_i64().unwrap();
    let (status, entry) = app.get(&format!("/api/history/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert!(entry["products"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_staff_submit_is_scoped() {
    let app = TestApp::new().await;
    let staff = app.user_token("maria", "Staff-North Branch").await;

    let (status, _) = app
        .post(&format!("/api/inventory/reset?branch={NORTH}"), &staff, json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(&format!("/api/inventory/reset?branch={SOUTH}"), &staff, json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2006);
}

#[tokio::test]
async fn test_explicit_history_save_round_trips_casing() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, saved) = app
        .post(
            "/api/history",
            &admin,
            json!({
                "branch": "south branch",
                "products": [
                    { "name": "Salt", "category": "Condiments", "price": 1, "begInventory": 3, "current": 3 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{saved}");
    assert_eq!(saved["branch"], "south branch");

    let (_, upper) = app.get("/api/history?branch=SOUTH%20BRANCH", &admin).await;
    let (_, mixed) = app.get("/api/history?branch=South%20Branch", &admin).await;
    assert_eq!(upper.as_array().unwrap().len(), 1);
    assert_eq!(upper, mixed);
    assert_eq!(upper[0]["products"][0]["name"], "Salt");
    assert_eq!(upper[0]["products"][0]["withdrawal"], 0.0);

    let (status, body) = app
        .post("/api/history", &admin, json!({ "branch": "Atlantis" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_history_access_control() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, south) = app
        .post(&format!("/api/inventory/reset?branch={SOUTH}"), &admin, json!({}))
        .await;
    let south_id = south["historyId"].as_i64().unwrap();

    let staff = app.user_token("maria", "Staff-North Branch").await;

    // Full history is admin only
    let (status, body) = app.get("/api/history", &staff).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);
    let (status, all) = app.get("/api/history", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = app
        .get(&format!("/api/history?branch={SOUTH}"), &staff)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.get(&format!("/api/history/{south_id}"), &staff).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, mine) = app
        .get(&format!("/api/history?branch={NORTH}"), &staff)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(mine.as_array().unwrap().is_empty());

    let (status, body) = app.get("/api/history/424242", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    app.create_product(&admin, NORTH, rice()).await;
    app.create_product(
        &admin,
        SOUTH,
        json!({ "name": "Eggs", "category": "Dairy", "use": 2 }),
    )
    .await;

    let (status, stats) = app.get("/api/dashboard", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["branches"], 2);
    assert_eq!(stats["products"], 2);
    assert_eq!(stats["negativeStock"], 1);
    assert_eq!(stats["users"], 1);
    assert_eq!(stats["productsByBranch"].as_array().unwrap().len(), 2);

    let staff = app.user_token("maria", "Staff-North Branch").await;
    let (_, stats) = app.get("/api/dashboard", &staff).await;
    let by_branch = stats["productsByBranch"].as_array().unwrap();
    assert_eq!(by_branch.len(), 1);
    assert_eq!(by_branch[0]["branch"], "northbranch");
    assert_eq!(by_branch[0]["products"], 1);
}
