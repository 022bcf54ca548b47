mod common;

use common::TestApp;
use mongodb::bson::{doc, Document};
use serde_json::{json, Value};

#[tokio::test]
async fn signup_creates_user_with_zero_balance_and_default_role() {
    let app = TestApp::spawn().await;

    let response = app.signup("ada", "ada@example.com", "a-strong-password").await;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully!");
    assert!(body["userId"].is_string());

    let user = app
        .db
        .collection::<Document>("users")
        .find_one(doc! { "username": "ada" }, None)
        .await
        .unwrap()
        .expect("user was created");
    assert_eq!(user.get_f64("balance").unwrap(), 0.0);
    assert!(user.get_str("roleId").is_ok(), "default role is assigned");
    assert!(
        user.get_str("passwordHash").unwrap().starts_with("$argon2"),
        "password is stored hashed"
    );

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;

    let first = app.signup("ada", "ada@example.com", "a-strong-password").await;
    assert_eq!(first.status(), 201);

    let second = app
        .signup("another", "ada@example.com", "a-strong-password")
        .await;
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Email is already taken.");

    let count = app
        .db
        .collection::<Document>("users")
        .count_documents(doc! { "email": "ada@example.com" }, None)
        .await
        .unwrap();
    assert_eq!(count, 1, "no second record is created");

    app.cleanup().await;
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = TestApp::spawn().await;

    let first = app.signup("ada", "ada@example.com", "a-strong-password").await;
    assert_eq!(first.status(), 201);

    let second = app
        .signup("ada", "other@example.com", "a-strong-password")
        .await;
    assert_eq!(second.status(), 400);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["error"], "Username already taken.");

    app.cleanup().await;
}

#[tokio::test]
async fn login_returns_role_and_permissions() {
    let app = TestApp::spawn().await;

    let signup = app.signup("ada", "ada@example.com", "a-strong-password").await;
    assert_eq!(signup.status(), 201);

    let response = app
        .client
        .post(format!("{}/user/login", app.address))
        .json(&json!({ "username": "ada", "password": "a-strong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Authentication successful");
    assert_eq!(body["role"], "user");
    assert_eq!(body["permissions"], json!(["read", "write"]));
    assert_eq!(body["accountNumber"], "12345678");
    assert!(!body["token"].as_str().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn admin_login_carries_admin_permissions() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/user/login", app.address))
        .json(&json!({ "username": "admin", "password": common::ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"], "admin");
    assert_eq!(
        body["permissions"],
        json!(["read", "write", "delete", "admin-access"])
    );

    app.cleanup().await;
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::spawn().await;

    let signup = app.signup("ada", "ada@example.com", "a-strong-password").await;
    assert_eq!(signup.status(), 201);

    let wrong_password = app
        .client
        .post(format!("{}/user/login", app.address))
        .json(&json!({ "username": "ada", "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), 401);

    // Unknown usernames fail identically: no user-existence leak
    let unknown_user = app
        .client
        .post(format!("{}/user/login", app.address))
        .json(&json!({ "username": "nobody", "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown_user.status(), 401);

    let wrong_body: Value = wrong_password.json().await.unwrap();
    let unknown_body: Value = unknown_user.json().await.unwrap();
    assert_eq!(wrong_body["error"], unknown_body["error"]);

    app.cleanup().await;
}

#[tokio::test]
async fn missing_auth_header_is_forbidden() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/dashboard", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    app.cleanup().await;
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let app = TestApp::spawn().await;

    let token = app.register_and_login("ada").await;

    // Flip the last character of the signature
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });

    let response = app.get_auth("/dashboard", &tampered).await;
    assert_eq!(response.status(), 401);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Token invalid or expired");

    app.cleanup().await;
}
