// tests/common/gps_helper.rs
use axum::{http::StatusCode, Router};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::auth_helper::TestUser;
use crate::common::request::{body_json, create_public_request, create_request};

/// Creates an Overland source for `user` and returns its token
pub async fn create_overland_source(app: &Router, user: &TestUser) -> String {
    let req = create_request(
        "POST",
        "/api/gps/source",
        &user.access_token,
        &json!({ "type": "OVERLAND" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    body_json(res).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub fn overland_location(lat: f64, lon: f64, timestamp: DateTime<Utc>) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lon, lat] },
        "properties": {
            "timestamp": timestamp.to_rfc3339(),
            "speed": 10.0,
            "horizontal_accuracy": 5.0,
            "battery_level": 0.5,
            "device_id": "iphone"
        }
    })
}

/// Pushes locations through the Overland endpoint
pub async fn push_overland(app: &Router, token: &str, locations: Vec<Value>) -> StatusCode {
    let req = create_public_request(
        "POST",
        &format!("/api/overland?token={}", token),
        Some(json!({ "locations": locations })),
    );
    app.clone().oneshot(req).await.unwrap().status()
}
