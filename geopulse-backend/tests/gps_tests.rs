// tests/gps_tests.rs

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use geopulse_backend::domain::gps_source_type::GpsSourceType;
use geopulse_backend::repository::gps_point_repository::{GpsPointRepository, NewGpsPoint};
use geopulse_backend::repository::user_repository::UserRepository;

use common::auth_helper::setup_authenticated_user;
use common::gps_helper::{create_overland_source, overland_location, push_overland};
use common::request::{body_json, create_empty_request, create_request};

fn owntracks_request(username: &str, password: &str, payload: Value) -> Request<Body> {
    let credentials = STANDARD.encode(format!("{}:{}", username, password));
    Request::builder()
        .method("POST")
        .uri("/api/owntracks")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Basic {}", credentials))
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_owntracks_ingests_only_location_messages() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_request(
        "POST",
        "/api/gps/source",
        &user.access_token,
        &json!({ "type": "OWNTRACKS", "username": "anna-phone", "password": "s3cret-pass" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let payload = json!([
        { "_type": "location", "tst": 1_700_000_000, "lat": 50.45, "lon": 30.52, "tid": "ph" },
        { "_type": "transition", "tst": 1_700_000_100, "lat": 50.46, "lon": 30.53 },
        { "_type": "location", "tst": 1_700_000_000, "lat": 50.45, "lon": 30.52 },
        { "_type": "location", "tst": 1_700_000_200, "lat": 95.0, "lon": 30.52 }
    ]);
    let res = app
        .clone()
        .oneshot(owntracks_request("anna-phone", "s3cret-pass", payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await, json!([]));

    let req = create_empty_request("GET", "/api/gps/points", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["data"][0]["device_id"], "ph");
    assert_eq!(body["data"]["data"][0]["source_type"], "OWNTRACKS");
}

#[tokio::test]
async fn test_owntracks_rejects_bad_credentials() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_request(
        "POST",
        "/api/gps/source",
        &user.access_token,
        &json!({ "type": "OWNTRACKS", "username": "bob-phone", "password": "right-pass" }),
    );
    app.clone().oneshot(req).await.unwrap();

    let single = json!({ "_type": "location", "tst": 1_700_000_000, "lat": 1.0, "lon": 1.0 });
    let res = app
        .clone()
        .oneshot(owntracks_request("bob-phone", "wrong-pass", single.clone()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/owntracks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(single.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_owntracks_username_conflicts() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    let payload = json!({ "type": "OWNTRACKS", "username": "shared-name", "password": "pass-123" });

    let res = app
        .clone()
        .oneshot(create_request("POST", "/api/gps/source", &user.access_token, &payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = app
        .oneshot(create_request("POST", "/api/gps/source", &user.access_token, &payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_overland_converts_units_and_skips_duplicates() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    let token = create_overland_source(&app, &user).await;

    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let locations = vec![
        overland_location(50.45, 30.52, at),
        overland_location(50.45, 30.52, at),
    ];

    assert_eq!(push_overland(&app, &token, locations.clone()).await, StatusCode::OK);
    assert_eq!(push_overland(&app, &token, locations).await, StatusCode::OK);

    let req = create_empty_request("GET", "/api/gps/points", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let point = &body["data"]["data"][0];
    assert_eq!(point["velocity"], 36.0);
    assert_eq!(point["battery"], 50.0);
    assert_eq!(point["source_type"], "OVERLAND");
}

#[tokio::test]
async fn test_overland_requires_known_active_token() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    let token = create_overland_source(&app, &user).await;
    let location = vec![overland_location(1.0, 1.0, Utc::now())];

    assert_eq!(
        push_overland(&app, "unknown-token-value", location.clone()).await,
        StatusCode::UNAUTHORIZED
    );

    let req = create_empty_request("GET", "/api/gps/source", &user.access_token);
    let body = body_json(app.clone().oneshot(req).await.unwrap()).await;
    let source_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let req = create_request(
        "PUT",
        &format!("/api/gps/source/{}/status", source_id),
        &user.access_token,
        &json!({ "active": false }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["data"]["active"], false);

    assert_eq!(
        push_overland(&app, &token, location).await,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_points_time_window_and_paging() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    let token = create_overland_source(&app, &user).await;

    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let locations = (0..5)
        .map(|i| overland_location(50.0, 30.0 + i as f64 * 0.01, start + Duration::hours(i)))
        .collect();
    push_overland(&app, &token, locations).await;

    let uri = "/api/gps/points?from=2024-05-01T01:00:00Z&to=2024-05-01T03:00:00Z&limit=2";
    let req = create_empty_request("GET", uri, &user.access_token);
    let body = body_json(app.clone().oneshot(req).await.unwrap()).await;
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);
    // newest first
    assert_eq!(body["data"]["data"][0]["timestamp"], "2024-05-01T03:00:00Z");

    let uri = "/api/gps/points?from=2024-05-02T00:00:00Z&to=2024-05-01T00:00:00Z";
    let res = app
        .oneshot(create_empty_request("GET", uri, &user.access_token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_points_reject_page_beyond_addressable_rows() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let uri = "/api/gps/points?page=9223372036854775807&limit=100";
    let res = app
        .clone()
        .oneshot(create_empty_request("GET", uri, &user.access_token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "page is too large");

    let uri = "/api/gps/points?page=50000&limit=100";
    let res = app
        .oneshot(create_empty_request("GET", uri, &user.access_token))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_duplicate_points_are_skipped() {
    let db = common::app_helper::setup_db().await;
    let user = UserRepository::new(db.clone())
        .create("tracker@example.com", "Tracker", "hash".to_string())
        .await
        .unwrap();

    let repo = GpsPointRepository::new(db);
    let point = NewGpsPoint {
        device_id: Some("phone".to_string()),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        latitude: 50.45,
        longitude: 30.52,
        accuracy: None,
        altitude: None,
        velocity: None,
        battery: None,
    };

    let (first, second) = tokio::join!(
        repo.insert_if_absent(user.id, GpsSourceType::Owntracks, point.clone()),
        repo.insert_if_absent(user.id, GpsSourceType::Overland, point.clone()),
    );
    let written = [first.unwrap(), second.unwrap()];
    assert_eq!(written.iter().filter(|w| **w).count(), 1);

    let (_, total) = repo
        .find_paginated_for_user(user.id, None, None, 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
}

#[tokio::test]
async fn test_duplicate_in_batch_keeps_later_points() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    let token = create_overland_source(&app, &user).await;

    let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let status = push_overland(
        &app,
        &token,
        vec![
            overland_location(50.0, 30.0, start),
            overland_location(50.0, 30.0, start),
            overland_location(50.1, 30.0, start + Duration::minutes(5)),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let req = create_empty_request("GET", "/api/gps/points", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body["data"]["pagination"]["total"], 2);
}
