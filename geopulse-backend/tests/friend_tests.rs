// tests/friend_tests.rs

mod common;

use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::auth_helper::{register_user, TestUser};
use common::request::{body_json, create_empty_request, create_request};

async fn invite(app: &Router, from: &TestUser, email: &str) -> (StatusCode, Value) {
    let req = create_request(
        "POST",
        "/api/friends/invitations",
        &from.access_token,
        &json!({ "email": email }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

async fn call(app: &Router, method: &str, uri: &str, user: &TestUser) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(create_empty_request(method, uri, &user.access_token))
        .await
        .unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

#[tokio::test]
async fn test_cannot_invite_self_or_unknown_user() {
    let app = common::app_helper::setup_app().await;
    let anna = register_user(&app, "anna@example.com", "Anna").await;

    let (status, _) = invite(&app, &anna, "anna@example.com").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = invite(&app, &anna, "ghost@example.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_accepting_creates_symmetric_friendship() {
    let app = common::app_helper::setup_app().await;
    let anna = register_user(&app, "anna@example.com", "Anna").await;
    let bohdan = register_user(&app, "bohdan@example.com", "Bohdan").await;

    let (status, body) = invite(&app, &anna, "Bohdan@Example.com").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "PENDING");
    let invitation_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = invite(&app, &bohdan, "anna@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = call(&app, "GET", "/api/friends/invitations/received", &bohdan).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["sender"]["full_name"], "Anna");

    // the sender cannot accept on the receiver's behalf
    let accept_uri = format!("/api/friends/invitations/{}/accept", invitation_id);
    let (status, _) = call(&app, "POST", &accept_uri, &anna).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "POST", &accept_uri, &bohdan).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ACCEPTED");

    let (_, body) = call(&app, "GET", "/api/friends", &anna).await;
    assert_eq!(body["data"][0]["email"], "bohdan@example.com");
    let (_, body) = call(&app, "GET", "/api/friends", &bohdan).await;
    assert_eq!(body["data"][0]["email"], "anna@example.com");

    let (status, _) = call(&app, "POST", &accept_uri, &bohdan).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = invite(&app, &anna, "bohdan@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_removing_friend_removes_both_directions() {
    let app = common::app_helper::setup_app().await;
    let anna = register_user(&app, "anna@example.com", "Anna").await;
    let bohdan = register_user(&app, "bohdan@example.com", "Bohdan").await;

    let (_, body) = invite(&app, &anna, "bohdan@example.com").await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    call(&app, "POST", &format!("/api/friends/invitations/{}/accept", id), &bohdan).await;

    let (status, _) = call(&app, "DELETE", &format!("/api/friends/{}", anna.id), &bohdan).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = call(&app, "GET", "/api/friends", &anna).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = call(&app, "DELETE", &format!("/api/friends/{}", bohdan.id), &anna).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reject_and_cancel() {
    let app = common::app_helper::setup_app().await;
    let anna = register_user(&app, "anna@example.com", "Anna").await;
    let bohdan = register_user(&app, "bohdan@example.com", "Bohdan").await;
    let chen = register_user(&app, "chen@example.com", "Chen").await;

    let (_, body) = invite(&app, &anna, "bohdan@example.com").await;
    let to_bohdan = body["data"]["id"].as_str().unwrap().to_string();
    let (_, body) = invite(&app, &anna, "chen@example.com").await;
    let to_chen = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = call(&app, "GET", "/api/friends/invitations/sent", &anna).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let reject_uri = format!("/api/friends/invitations/{}/reject", to_bohdan);
    let (status, _) = call(&app, "POST", &reject_uri, &chen).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = call(&app, "POST", &reject_uri, &bohdan).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "REJECTED");

    let cancel_uri = format!("/api/friends/invitations/{}", to_chen);
    let (status, _) = call(&app, "DELETE", &cancel_uri, &chen).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app, "DELETE", &cancel_uri, &anna).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "CANCELLED");

    let (_, body) = call(&app, "GET", "/api/friends/invitations/sent", &anna).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}
