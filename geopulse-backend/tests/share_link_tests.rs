// tests/share_link_tests.rs

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::auth_helper::{register_user, setup_authenticated_user, TestUser};
use common::gps_helper::{create_overland_source, overland_location, push_overland};
use common::request::{body_json, create_empty_request, create_public_request, create_request};

async fn create_link(app: &Router, user: &TestUser, payload: Value) -> (StatusCode, Value) {
    let req = create_request("POST", "/api/share-links", &user.access_token, &payload);
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

async fn verify(app: &Router, id: &str, body: Option<Value>) -> (StatusCode, Value) {
    let req = create_public_request("POST", &format!("/api/shared/{}/verify", id), body);
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

#[tokio::test]
async fn test_link_dto_has_exact_keys() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let (status, body) = create_link(&app, &user, json!({ "name": "Family" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut keys: Vec<&String> = body["data"].as_object().unwrap().keys().collect();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "created_at",
            "expires_at",
            "has_password",
            "id",
            "is_active",
            "name",
            "show_history",
            "view_count"
        ]
    );
    assert_eq!(body["data"]["has_password"], false);
    assert_eq!(body["data"]["view_count"], 0);
}

#[tokio::test]
async fn test_public_info_and_password_check() {
    let app = common::app_helper::setup_app().await;
    let user = register_user(&app, "owner@example.com", "Olena Owner").await;

    let (_, body) = create_link(
        &app,
        &user,
        json!({ "name": "Trip", "password": "letmein", "show_history": true }),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let res = app
        .clone()
        .oneshot(create_public_request("GET", &format!("/api/shared/{}/info", id), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let info = body_json(res).await;
    assert_eq!(info["data"]["has_password"], true);
    assert_eq!(info["data"]["shared_by"], "Olena Owner");

    let (status, _) = verify(&app, &id, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = verify(&app, &id, Some(json!({ "password": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid password");

    let (status, body) = verify(&app, &id, Some(json!({ "password": "letmein" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
}

#[tokio::test]
async fn test_view_count_grows_with_each_verification() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let (_, body) = create_link(&app, &user, json!({ "name": "Open" })).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for _ in 0..3 {
        let (status, _) = verify(&app, &id, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let req = create_empty_request("GET", "/api/share-links", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["data"][0]["view_count"], 3);
}

#[tokio::test]
async fn test_shared_location_requires_token_for_that_link() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let token = create_overland_source(&app, &user).await;
    let now = Utc::now();
    push_overland(
        &app,
        &token,
        vec![
            overland_location(50.40, 30.50, now - Duration::hours(2)),
            overland_location(50.41, 30.51, now - Duration::minutes(5)),
        ],
    )
    .await;

    let (_, first) = create_link(&app, &user, json!({ "name": "A", "show_history": true })).await;
    let (_, second) = create_link(&app, &user, json!({ "name": "B" })).await;
    let first_id = first["data"]["id"].as_str().unwrap().to_string();
    let second_id = second["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = verify(&app, &first_id, None).await;
    let access_token = body["data"]["access_token"].as_str().unwrap().to_string();

    let location_uri = format!("/api/shared/{}/location", first_id);
    let res = app
        .clone()
        .oneshot(create_public_request("GET", &location_uri, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri(&location_uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["data"]["current"]["latitude"], 50.41);
    assert_eq!(body["data"]["history"].as_array().unwrap().len(), 2);

    // a token issued for one link does not open another
    let uri = format!("/api/shared/{}/location?token={}", second_id, access_token);
    let res = app
        .oneshot(create_public_request("GET", &uri, None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_link_is_hidden() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let (_, body) = create_link(&app, &user, json!({ "name": "Temp" })).await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let req = create_request(
        "PUT",
        &format!("/api/share-links/{}", id),
        &user.access_token,
        &json!({ "name": "Temp", "is_active": false }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .clone()
        .oneshot(create_public_request("GET", &format!("/api/shared/{}/info", id), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(res).await["error"], "Shared link not found or expired");

    let (status, _) = verify(&app, &id, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_past_expiry_and_link_cap_are_rejected() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let past = (Utc::now() - Duration::hours(1)).to_rfc3339();
    let (status, _) = create_link(&app, &user, json!({ "name": "Old", "expires_at": past })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // the test configuration allows three active links
    for i in 0..3 {
        let (status, _) = create_link(&app, &user, json!({ "name": format!("Link {}", i) })).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = create_link(&app, &user, json!({ "name": "One too many" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_renaming_expired_link_respects_link_cap() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let soon = (Utc::now() + Duration::seconds(1)).to_rfc3339();
    let (status, body) = create_link(&app, &user, json!({ "name": "Brief", "expires_at": soon })).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    tokio::time::sleep(std::time::Duration::from_millis(1500)).await;

    for i in 0..3 {
        let (status, _) = create_link(&app, &user, json!({ "name": format!("Link {}", i) })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // dropping the expiry would make a fourth link viewable
    let req = create_request(
        "PUT",
        &format!("/api/share-links/{}", id),
        &user.access_token,
        &json!({ "name": "Short" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(res).await["error"],
        "You can have at most 3 active share links"
    );

    let req = create_request(
        "PUT",
        &format!("/api/share-links/{}", id),
        &user.access_token,
        &json!({ "name": "Short", "is_active": false }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .oneshot(create_public_request("GET", &format!("/api/shared/{}/info", id), None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_link_id_is_bad_request() {
    let app = common::app_helper::setup_app().await;

    let res = app
        .oneshot(create_public_request("GET", "/api/shared/not-a-uuid/info", None))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
