//! End-to-end tests against the full router

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn ping() {
    let app = TestApp::new();

    let response = app.get("/ping").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "pong" }));
}

#[tokio::test(start_paused = true)]
async fn sleep_waits_the_full_interval() {
    let app = TestApp::new();
    let started = tokio::time::Instant::now();

    let response = app.get("/sleep").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "Woke up after 5 seconds" }));
    assert!(started.elapsed() >= std::time::Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn sleep_message_reports_configured_interval() {
    let app = TestApp::with_sleep_interval(std::time::Duration::from_secs(2));

    let response = app.get("/sleep").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "message": "Woke up after 2 seconds" }));
}

#[tokio::test]
async fn create_user_never_echoes_password() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/users/",
            json!({
                "username": "testuser",
                "email": "test@example.com",
                "password": "password123",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "testuser");
    assert_eq!(response.body["email"], "test@example.com");
    assert!(response.body["id"].is_i64());
    assert!(response.body.get("password").is_none());
    assert!(!response.raw.contains("password123"));

    let listed = app.get("/users/").await;
    assert!(!listed.raw.contains("password123"));
}

#[tokio::test]
async fn get_users_in_creation_order() {
    let app = TestApp::new();
    for (username, password) in [("user1", "pass1"), ("user2", "pass2")] {
        app.post_json(
            "/users/",
            json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": password,
            }),
        )
        .await;
    }

    let response = app.get("/users/").await;

    assert_eq!(response.status, StatusCode::OK);
    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "user1");
    assert_eq!(users[1]["username"], "user2");
    assert!(users[0]["id"].as_i64() < users[1]["id"].as_i64());
}

#[tokio::test]
async fn collection_routes_answer_with_and_without_trailing_slash() {
    let app = TestApp::new();
    app.create_user("slash").await;

    assert_eq!(app.get("/users").await.body, app.get("/users/").await.body);
    assert_eq!(app.get("/orders").await.status, StatusCode::OK);
}

#[tokio::test]
async fn create_order() {
    let app = TestApp::new();
    let user_id = app.create_user("orderuser").await;

    let response = app
        .post_json(
            "/orders/",
            json!({ "user_id": user_id, "amount": 99.99, "status": "pending" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user_id"], user_id);
    assert_eq!(response.body["amount"], 99.99);
    assert_eq!(response.body["status"], "pending");
    assert!(response.body["id"].is_i64());
}

#[tokio::test]
async fn create_order_defaults_status_to_pending() {
    let app = TestApp::new();
    let user_id = app.create_user("defaults").await;

    let omitted = app
        .post_json("/orders/", json!({ "user_id": user_id, "amount": 1.0 }))
        .await;
    let null = app
        .post_json(
            "/orders/",
            json!({ "user_id": user_id, "amount": 2.0, "status": null }),
        )
        .await;

    assert_eq!(omitted.body["status"], "pending");
    assert_eq!(null.body["status"], "pending");
}

#[tokio::test]
async fn create_order_nonexistent_user() {
    let app = TestApp::new();
    app.create_user("someone").await;

    let response = app
        .post_json("/orders/", json!({ "user_id": 9999, "amount": 99.99 }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "detail": "User not found" }));
    assert_eq!(app.store.order_count().await, 0);
    assert_eq!(app.get("/orders/").await.body, json!([]));
}

#[tokio::test]
async fn get_orders_in_creation_order() {
    let app = TestApp::new();
    let user_id = app.create_user("ordersuser").await;
    for (amount, status) in [(10.50, "pending"), (25.75, "completed")] {
        app.post_json(
            "/orders/",
            json!({ "user_id": user_id, "amount": amount, "status": status }),
        )
        .await;
    }

    let response = app.get("/orders/").await;

    assert_eq!(response.status, StatusCode::OK);
    let orders = response.body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["amount"], 10.50);
    assert_eq!(orders[1]["amount"], 25.75);
    assert_eq!(orders[1]["status"], "completed");
}

#[tokio::test]
async fn get_order_by_id_roundtrip() {
    let app = TestApp::new();
    let user_id = app.create_user("roundtrip").await;
    let created = app
        .post_json(
            "/orders/",
            json!({ "user_id": user_id, "amount": 99.99, "status": "processing" }),
        )
        .await;
    let id = created.body["id"].as_i64().unwrap();

    let response = app.get(&format!("/orders/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, created.body);
    assert_eq!(response.body["status"], "processing");
}

#[tokio::test]
async fn get_order_by_id_nonexistent() {
    let app = TestApp::new();

    let response = app.get("/orders/9999").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!({ "detail": "Order not found" }));
}

#[tokio::test]
async fn alice_scenario() {
    let app = TestApp::new();
    let alice = app.create_user("alice").await;

    let created = app
        .post_json("/orders/", json!({ "user_id": alice, "amount": 10.5 }))
        .await;
    assert_eq!(created.status, StatusCode::OK);

    let orders = app.get("/orders/").await;
    assert_eq!(
        orders.body,
        json!([{
            "id": created.body["id"],
            "user_id": alice,
            "amount": 10.5,
            "status": "pending",
        }])
    );

    let missing = app.get("/orders/424242").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["detail"], "Order not found");
}

#[tokio::test]
async fn malformed_payloads_are_rejected_before_the_service() {
    let app = TestApp::new();
    let user_id = app.create_user("validation").await;

    let broken = app.post_raw("/orders/", "{ not json").await;
    let missing_amount = app.post_json("/orders/", json!({ "user_id": user_id })).await;
    let wrong_type = app
        .post_json("/users/", json!({ "username": 1, "email": "x", "password": "y" }))
        .await;

    for response in [&broken, &missing_amount, &wrong_type] {
        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.body["detail"].is_string());
    }
    assert_eq!(app.store.order_count().await, 0);
    assert_eq!(app.store.user_count().await, 1);
}

#[tokio::test]
async fn non_numeric_order_id_is_rejected() {
    let app = TestApp::new();

    let response = app.get("/orders/abc").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_route_is_404_with_request_id() {
    let app = TestApp::new();

    let response = app.get("/nope").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(!response.request_id.is_empty());
}

#[tokio::test]
async fn every_response_has_its_own_request_id() {
    let app = TestApp::new();
    let user_id = app.create_user("ids").await;

    let responses = [
        app.get("/ping").await,
        app.get("/users/").await,
        app.post_json("/orders/", json!({ "user_id": user_id, "amount": 3.0 }))
            .await,
        app.post_json("/orders/", json!({ "user_id": 0, "amount": 3.0 }))
            .await,
        app.get("/orders/0").await,
    ];

    let mut ids: Vec<_> = responses.iter().map(|r| r.request_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), responses.len());
}
