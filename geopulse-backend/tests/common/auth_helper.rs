// tests/common/auth_helper.rs
use axum::{http::StatusCode, Router};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::request::{body_json, create_public_request};

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub access_token: String,
}

pub const TEST_PASSWORD: &str = "correct horse battery";

/// Registers a new account and returns its access token
pub async fn register_user(app: &Router, email: &str, full_name: &str) -> TestUser {
    let req = create_public_request(
        "POST",
        "/api/auth/register",
        Some(json!({
            "email": email,
            "fullName": full_name,
            "password": TEST_PASSWORD,
        })),
    );

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = body_json(res).await;

    TestUser {
        id: body["data"]["user"]["id"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        access_token: body["data"]["access_token"].as_str().unwrap().to_string(),
    }
}

pub async fn setup_authenticated_user(app: &Router) -> TestUser {
    let email = format!("user-{}@example.com", Uuid::new_v4().simple());
    register_user(app, &email, "Test User").await
}
