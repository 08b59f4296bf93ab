mod common;

use auth::Subject;
use auth::TokenType;
use chrono::Duration;
use chrono::Utc;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;
use uuid::Uuid;

const PASSWORD: &str = "Sup3rSecret!";

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn().await;

    let response = app.get("/health").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "healthy");
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let body = app.register("alice@example.com", PASSWORD).await;

    assert_eq!(body["status_code"], 201);
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["first_name"], "Alice");
    assert_eq!(body["data"]["user"]["is_active"], true);
    assert_eq!(body["data"]["user"]["is_verified"], false);
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["access_token"].is_string());
    assert!(body["data"]["refresh_token"].is_string());

    let access_token = body["data"]["access_token"].as_str().unwrap();
    let claims = app
        .tokens
        .validate(access_token, TokenType::Access)
        .expect("Issued access token must validate");
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(
        claims.user_id.to_string(),
        body["data"]["user"]["id"].as_str().unwrap()
    );
}

#[tokio::test]
async fn test_register_stores_salted_hash() {
    let app = TestApp::spawn().await;

    app.register("alice@example.com", PASSWORD).await;
    app.register("bob@example.com", PASSWORD).await;

    let alice = app.stored_user("alice@example.com").await;
    let bob = app.stored_user("bob@example.com").await;

    assert_ne!(alice.password_hash, PASSWORD);
    assert!(alice.password_hash.starts_with("$argon2id$"));
    assert_ne!(alice.password_hash, bob.password_hash);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", PASSWORD).await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "An0therSecret",
            "first_name": "Alice",
            "last_name": "Other"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_weak_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "alice@example.com",
            "password": "short",
            "first_name": "Alice",
            "last_name": "Liddell"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    let message = body["data"]["message"].as_str().unwrap();
    assert!(message.contains("at least 8"));
    assert!(!message.contains("short"));
}

#[tokio::test]
async fn test_register_invalid_fields() {
    let app = TestApp::spawn().await;

    for body in [
        json!({ "email": "not-an-email", "password": PASSWORD, "first_name": "Alice", "last_name": "Liddell" }),
        json!({ "email": "alice@example.com", "password": PASSWORD, "first_name": "A", "last_name": "Liddell" }),
        json!({ "email": "alice@example.com", "password": PASSWORD, "first_name": "Alice", "last_name": "Liddell", "phone": "123" }),
    ] {
        let response = app
            .post("/api/v1/auth/register")
            .json(&body)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", PASSWORD).await;
    let before = Utc::now().timestamp();

    let response = app.login("alice@example.com", PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let expires_at = body["data"]["expires_at"].as_i64().unwrap();
    let expected = before + Duration::hours(24).num_seconds();
    assert!((expires_at - expected).abs() <= 5);

    let access_token = body["data"]["access_token"].as_str().unwrap();
    let profile = app
        .get_authenticated("/api/v1/users/profile", access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(profile.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register("alice@example.com", PASSWORD).await;

    let wrong_password = app.login("alice@example.com", "wrong-password").await;
    let unknown_email = app.login("nobody@example.com", PASSWORD).await;
    let malformed_email = app.login("not-an-email", PASSWORD).await;

    let mut bodies = Vec::new();
    for response in [wrong_password, unknown_email, malformed_email] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        bodies.push(response.json::<Value>().await.unwrap());
    }

    assert_eq!(bodies[0]["data"]["message"], "Invalid email or password");
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[tokio::test]
async fn test_refresh_issues_new_pair() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let refresh_token = registered["data"]["refresh_token"].as_str().unwrap();

    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let access_token = body["data"]["access_token"].as_str().unwrap();
    let claims = app.tokens.validate(access_token, TokenType::Access).unwrap();
    assert_eq!(
        claims.user_id.to_string(),
        registered["data"]["user"]["id"].as_str().unwrap()
    );
    assert!(body["data"]["refresh_token"].is_string());
    assert!(body["data"]["expires_at"].is_i64());
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let access_token = registered["data"]["access_token"].as_str().unwrap();

    let response = app
        .post("/api/v1/auth/refresh")
        .json(&json!({ "refresh_token": access_token }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Unauthorized");
}

#[tokio::test]
async fn test_protected_routes_reject_bad_credentials() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let refresh_token = registered["data"]["refresh_token"].as_str().unwrap();

    let expired = app
        .tokens
        .issue_pair_at(
            &Subject::new(Uuid::new_v4(), "ghost@example.com"),
            Utc::now() - Duration::hours(48),
        )
        .unwrap()
        .access_token;

    let requests = [
        app.get("/api/v1/users/profile"),
        app.get("/api/v1/users/profile")
            .header("Authorization", "Basic dXNlcjpwYXNz"),
        app.get("/api/v1/users/profile")
            .header("Authorization", "Bearer "),
        app.get_authenticated("/api/v1/users/profile", "not.a.token"),
        app.get_authenticated("/api/v1/users/profile", refresh_token),
        app.get_authenticated("/api/v1/users/profile", &expired),
    ];

    for request in requests {
        let response = request.send().await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["status_code"], 401);
        assert_eq!(body["data"]["message"], "Unauthorized");
    }
}

#[tokio::test]
async fn test_get_and_update_profile() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let access_token = registered["data"]["access_token"].as_str().unwrap();

    let response = app
        .put_authenticated("/api/v1/users/profile", access_token)
        .json(&json!({
            "first_name": "Alicia",
            "phone": "+15555550100",
            "date_of_birth": "1990-05-04"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["first_name"], "Alicia");
    assert_eq!(body["data"]["last_name"], "Liddell");

    let response = app
        .get_authenticated("/api/v1/users/profile", access_token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["first_name"], "Alicia");
    assert_eq!(body["data"]["phone"], "+15555550100");
    assert_eq!(body["data"]["date_of_birth"], "1990-05-04");
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let access_token = registered["data"]["access_token"].as_str().unwrap();

    let response = app
        .post_authenticated("/api/v1/users/change-password", access_token)
        .json(&json!({ "current_password": "wrong-password", "new_password": "N3wSecret!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_authenticated("/api/v1/users/change-password", access_token)
        .json(&json!({ "current_password": PASSWORD, "new_password": "N3wSecret!" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        app.login("alice@example.com", PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        app.login("alice@example.com", "N3wSecret!").await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn test_deactivate_blocks_login_and_profile() {
    let app = TestApp::spawn().await;
    let registered = app.register("alice@example.com", PASSWORD).await;
    let access_token = registered["data"]["access_token"].as_str().unwrap();

    let response = app
        .delete_authenticated("/api/v1/users/deactivate", access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!app.stored_user("alice@example.com").await.is_active);

    let response = app.login("alice@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["message"], "Invalid email or password");

    // The access token is still cryptographically valid, the account is not.
    let response = app
        .get_authenticated("/api/v1/users/profile", access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_email_is_case_insensitive() {
    let app = TestApp::spawn().await;

    let body = app.register("Alice@Example.com", PASSWORD).await;
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");

    let response = app.login("ALICE@example.COM", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post("/api/v1/auth/register")
        .json(&json!({
            "email": "alice@EXAMPLE.com",
            "password": PASSWORD,
            "first_name": "Alice",
            "last_name": "Other"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
