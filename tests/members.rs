mod common;

use axum::http::StatusCode;
use common::{body_json, sample_address, TestApp};
use serde_json::{json, Value};

async fn party_with_member(app: &TestApp, role: &str) -> (String, Value) {
    let party = app.create_wedding("2025-06-15", "navy").await;
    let id = party["id"].as_str().unwrap().to_string();
    let member = app.add_member(&id, "Sam Carter", role).await;
    (id, member)
}

#[tokio::test]
async fn add_member_assigns_sequential_ids() {
    let app = TestApp::new().await;
    let party = app.create_wedding("2025-06-15", "navy").await;
    let id = party["id"].as_str().unwrap();

    let first = app.add_member(id, "Sam Carter", "best_man").await;
    let second = app.add_member(id, "Leo Park", "groomsman").await;

    assert_eq!(first["id"], 1);
    assert_eq!(second["id"], 2);
    assert_eq!(first["role"], "best_man");
    assert_eq!(first["measurementStatus"], "pending");
    assert_eq!(first["needsShipping"], false);
}

#[tokio::test]
async fn add_member_requires_name_and_known_role() {
    let app = TestApp::new().await;
    let party = app.create_wedding("2025-06-15", "navy").await;
    let uri = format!("/weddings/{}/members", party["id"].as_str().unwrap());

    let resp = app.post_json(&uri, json!({ "name": " ", "role": "guest" })).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["error"].as_str().unwrap().contains("name"));

    let resp = app.post_json(&uri, json!({ "name": "Sam", "role": "ring_bearer" })).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["error"].as_str().unwrap().contains("role"));
}

#[tokio::test]
async fn add_member_to_unknown_party_is_not_found() {
    let app = TestApp::new().await;
    let resp = app
        .post_json("/weddings/missing/members", json!({ "name": "Sam", "role": "guest" }))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_member_merges_fields() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groomsman").await;

    let resp = app
        .patch_json(
            &format!("/weddings/{}/members/{}", id, member["id"]),
            json!({ "phone": "555-0100", "orderStatus": "delivered" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "Sam Carter");
    assert_eq!(updated["role"], "groomsman");
    assert_eq!(updated["phone"], "555-0100");

    // Read-after-write: progress sees the delivered order
    let resp = app
        .get(&format!("/weddings/{}/members/{}/progress", id, member["id"]))
        .await;
    let progress = body_json(resp).await;
    assert_eq!(progress["completed"], 1);
    assert_eq!(progress["total"], 3);
}

#[tokio::test]
async fn update_unknown_member_is_not_found() {
    let app = TestApp::new().await;
    let (id, _member) = party_with_member(&app, "groomsman").await;

    let resp = app
        .patch_json(&format!("/weddings/{}/members/42", id), json!({ "name": "Nobody" }))
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn remove_member_twice_is_idempotent() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "guest").await;
    let uri = format!("/weddings/{}/members/{}", id, member["id"]);

    let resp = app.delete(&uri).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = app.delete(&uri).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.get(&format!("/weddings/{}/stats", id)).await;
    assert_eq!(body_json(resp).await["totalMembers"], 0);

    // Ids are not handed out again after a removal
    let next = app.add_member(&id, "Leo Park", "guest").await;
    assert_eq!(next["id"], 2);
}

#[tokio::test]
async fn basic_measurements_mark_member_submitted() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groomsman").await;

    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/measurements", id, member["id"]),
            json!({ "chest": 40, "waist": 32, "height": 70 }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["measurementStatus"], "submitted");
    assert_eq!(updated["measurements"]["kind"], "basic");
    assert_eq!(updated["measurements"]["chest"], 40.0);
    assert!(updated["measurements"]["submittedAt"].is_string());
}

#[tokio::test]
async fn suit_measurements_complete_member() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "best_man").await;

    app.put_json(
        &format!("/weddings/{}/members/{}/measurements", id, member["id"]),
        json!({ "chest": 40, "inseam": 31 }),
    )
    .await;

    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/suit-measurements", id, member["id"]),
            json!({ "chest": 42, "waist": 34, "takenBy": "Alex" }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["measurementStatus"], "completed");
    assert_eq!(updated["measurements"]["kind"], "suit");
    assert_eq!(updated["measurements"]["chest"], 42.0);
    assert_eq!(updated["measurements"]["inseam"], 31.0);
    assert_eq!(updated["measurements"]["takenBy"], "Alex");
    assert!(updated["measurements"]["finalizedAt"].is_string());

    // A later partial update keeps earlier values
    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/suit-measurements", id, member["id"]),
            json!({ "jacketLength": 30.5 }),
        )
        .await;
    let updated = body_json(resp).await;
    assert_eq!(updated["measurements"]["chest"], 42.0);
    assert_eq!(updated["measurements"]["jacketLength"], 30.5);

    // Self-submission can no longer overwrite finalized measurements
    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/measurements", id, member["id"]),
            json!({ "chest": 39 }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn shipping_address_sets_needs_shipping() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groomsman").await;

    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/shipping-address", id, member["id"]),
            sample_address(),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["needsShipping"], true);
    assert_eq!(updated["shippingAddress"]["city"], "Portland");
}

#[tokio::test]
async fn shipping_address_requires_fields() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groomsman").await;

    let mut address = sample_address();
    address["city"] = json!("");
    let resp = app
        .put_json(
            &format!("/weddings/{}/members/{}/shipping-address", id, member["id"]),
            address,
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn order_status_accepts_any_transition() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groomsman").await;
    let uri = format!("/weddings/{}/members/{}/order-status", id, member["id"]);

    for status in ["delivered", "ordered", "in_production", "shipped"] {
        let resp = app.put_json(&uri, json!({ "status": status })).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["orderStatus"], status);
    }

    let resp = app.put_json(&uri, json!({ "status": "lost" })).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn member_progress_reaches_full() {
    let app = TestApp::new().await;
    let (id, member) = party_with_member(&app, "groom").await;
    let base = format!("/weddings/{}/members/{}", id, member["id"]);

    app.put_json(&format!("{}/suit-measurements", base), json!({ "chest": 44 }))
        .await;
    app.put_json(&format!("{}/shipping-address", base), sample_address())
        .await;
    app.put_json(&format!("{}/order-status", base), json!({ "status": "shipped" }))
        .await;

    let resp = app.get(&format!("{}/progress", base)).await;
    let progress = body_json(resp).await;
    assert_eq!(progress["completed"], 3);
    assert_eq!(progress["percentage"], 100.0);
}

#[tokio::test]
async fn progress_for_unknown_member_is_not_found() {
    let app = TestApp::new().await;
    let (id, _member) = party_with_member(&app, "groom").await;
    let resp = app.get(&format!("/weddings/{}/members/7/progress", id)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
