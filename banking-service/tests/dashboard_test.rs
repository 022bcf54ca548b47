mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn deposit_with_non_positive_amount_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("ada").await;

    let zero = app.deposit(&token, 0.0).await;
    assert_eq!(zero.status(), 400);

    let negative = app.deposit(&token, -5.0).await;
    assert_eq!(negative.status(), 400);

    let missing = app
        .patch_auth("/dashboard/deposit", &token, &json!({}))
        .await;
    assert_eq!(missing.status(), 400);

    assert_eq!(app.balance_of("ada").await, 0.0);

    app.cleanup().await;
}

#[tokio::test]
async fn deposit_increases_balance_by_exact_amount() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("ada").await;

    let first = app.deposit(&token, 100.0).await;
    assert_eq!(first.status(), 200);
    let body: Value = first.json().await.unwrap();
    assert_eq!(body["balance"], 100.0);

    let second = app.deposit(&token, 50.5).await;
    assert_eq!(second.status(), 200);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["balance"], 150.5);

    assert_eq!(app.balance_of("ada").await, 150.5);

    app.cleanup().await;
}

#[tokio::test]
async fn dashboard_returns_profile_balance_and_payments() {
    let app = TestApp::spawn().await;
    let token = app.register_and_login("ada").await;

    let response = app.get_auth("/dashboard", &token).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "Test");
    assert_eq!(body["accountNumber"], "12345678");
    assert_eq!(body["balance"], 0.0);
    assert_eq!(body["payments"], json!([]));

    // Fund the account and submit a transfer; it shows up as a receipt
    app.deposit(&token, 100.0).await;
    let payment = app.submit_payment(&token, 40.0).await;
    assert_eq!(payment.status(), 200);

    let response = app.get_auth("/dashboard", &token).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["balance"], 60.0);
    assert_eq!(body["payments"].as_array().unwrap().len(), 1);
    assert_eq!(body["payments"][0]["recipientName"], "Grace Hopper");
    assert_eq!(body["payments"][0]["status"], "Pending");

    app.cleanup().await;
}
