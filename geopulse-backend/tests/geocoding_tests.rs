// tests/geocoding_tests.rs

mod common;

use axum::{http::StatusCode, Router};
use sea_orm::ConnectionTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::auth_helper::{setup_authenticated_user, TestUser};
use common::request::{body_json, create_empty_request, create_public_request, create_request};

/// Caches one geocoding row per location by adding point favorites.
async fn seed_geocoding_results(app: &Router, user: &TestUser, locations: &[(f64, f64)]) {
    for (i, (lat, lon)) in locations.iter().enumerate() {
        let req = create_request(
            "POST",
            "/api/favorites/point",
            &user.access_token,
            &json!({ "name": format!("Place {}", i), "lat": lat, "lon": lon }),
        );
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }
}

async fn list(app: &Router, user: &TestUser, query: &str) -> (StatusCode, Value) {
    let req = create_empty_request("GET", &format!("/api/geocoding{}", query), &user.access_token);
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    (status, body_json(res).await)
}

const LOCATIONS: [(f64, f64); 3] = [(50.4501, 30.5234), (50.4600, 30.5300), (50.4700, 30.5400)];

#[tokio::test]
async fn test_listing_requires_authentication() {
    let app = common::app_helper::setup_app().await;

    let res = app
        .oneshot(create_public_request("GET", "/api/geocoding", None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Missing authentication token");
}

#[tokio::test]
async fn test_list_paginates_with_total_pages() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS).await;

    let (status, body) = list(&app, &user, "?page=2&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(
        body["pagination"],
        json!({ "page": 2, "limit": 2, "total": 3, "totalPages": 2 })
    );

    let (_, body) = list(&app, &user, "").await;
    assert_eq!(body["pagination"]["limit"], 50);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn test_list_rejects_non_positive_page() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let (status, _) = list(&app, &user, "?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = list(&app, &user, "?limit=-5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_rejects_page_beyond_addressable_rows() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS[..1]).await;

    let (status, body) = list(&app, &user, "?page=9223372036854775807&limit=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "page is too large");

    let (status, body) = list(&app, &user, "?page=1000000&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_list_filters_and_sorts() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS).await;

    let (_, body) = list(&app, &user, "?providerName=Photon").await;
    assert_eq!(body["pagination"]["total"], 0);

    let (_, body) = list(&app, &user, "?searchText=kyiv&sortField=id&sortOrder=asc").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    let ids: Vec<i64> = data.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(data[0]["displayName"], "Nominatim Street, Kyiv");

    let (_, body) = list(&app, &user, "?searchText=ky_v").await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn test_get_missing_result_is_404_with_error() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_empty_request("GET", "/api/geocoding/999", &user.access_token);
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = body_json(res).await;
    assert_eq!(body["error"], "Geocoding result not found: 999");
}

#[tokio::test]
async fn test_non_numeric_id_is_400_with_error() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_empty_request("GET", "/api/geocoding/abc", &user.access_token);
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Invalid id format for 'id': 'abc'");

    let req = create_request(
        "PUT",
        "/api/geocoding/abc",
        &user.access_token,
        &json!({ "displayName": "Renamed" }),
    );
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["error"], "Invalid id format for 'id': 'abc'");
}

#[tokio::test]
async fn test_update_result_names() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS[..1]).await;

    let (_, body) = list(&app, &user, "").await;
    let id = body["data"][0]["id"].as_i64().unwrap();

    let req = create_request(
        "PUT",
        &format!("/api/geocoding/{}", id),
        &user.access_token,
        &json!({ "displayName": "  Home  ", "city": "Kyiv", "country": "" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["displayName"], "Home");
    assert_eq!(body["city"], "Kyiv");
    assert!(body["country"].is_null());

    let req = create_request(
        "PUT",
        "/api/geocoding/424242",
        &user.access_token,
        &json!({ "displayName": "Nowhere" }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let req = create_request(
        "PUT",
        &format!("/api/geocoding/{}", id),
        &user.access_token,
        &json!({ "displayName": "   " }),
    );
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reconcile_all_with_other_provider() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS).await;

    let req = create_request(
        "POST",
        "/api/geocoding/reconcile",
        &user.access_token,
        &json!({ "providerName": "Photon", "reconcileAll": true }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res).await;
    assert_eq!(body["totalProcessed"], 3);
    assert_eq!(body["successCount"], 3);
    assert_eq!(body["failedCount"], 0);

    let (_, body) = list(&app, &user, "?providerName=Photon").await;
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["data"][0]["city"], "Kyiv City");

    let req = create_empty_request("GET", "/api/geocoding/providers/available", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;
    assert_eq!(body, json!(["Photon"]));
}

#[tokio::test]
async fn test_update_storage_failure_is_500_with_fixed_message() {
    let (app, db) =
        common::app_helper::setup_app_with_registry(common::app_helper::stub_registry()).await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS[..1]).await;

    let (_, body) = list(&app, &user, "").await;
    let id = body["data"][0]["id"].as_i64().unwrap();

    db.execute_unprepared("DROP TABLE reverse_geocoding_locations")
        .await
        .unwrap();

    let req = create_request(
        "PUT",
        &format!("/api/geocoding/{}", id),
        &user.access_token,
        &json!({ "displayName": "Home" }),
    );
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(res).await,
        json!({ "error": "Failed to update geocoding result" })
    );
}

#[tokio::test]
async fn test_reconcile_counts_rows_the_provider_could_not_resolve() {
    let (app, _db) =
        common::app_helper::setup_app_with_registry(common::app_helper::flaky_registry(50.465))
            .await;
    let user = setup_authenticated_user(&app).await;
    seed_geocoding_results(&app, &user, &LOCATIONS).await;

    let (_, body) = list(&app, &user, "?sortField=id&sortOrder=asc").await;
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();

    let req = create_request(
        "POST",
        "/api/geocoding/reconcile",
        &user.access_token,
        &json!({ "providerName": "Photon", "geocodingIds": ids }),
    );
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await,
        json!({
            "totalProcessed": 3,
            "successCount": 2,
            "failedCount": 1,
            "errors": [{
                "geocodingId": ids[2],
                "message": "Geocoding provider unavailable: rate limited"
            }]
        })
    );

    // the failed row keeps its previous provider
    let (_, body) = list(&app, &user, "?providerName=Nominatim").await;
    assert_eq!(body["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_reconcile_with_unknown_provider_fails() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_request(
        "POST",
        "/api/geocoding/reconcile",
        &user.access_token,
        &json!({ "providerName": "Mapbox", "geocodingIds": [1, 2] }),
    );
    let res = app.oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res).await;
    assert_eq!(
        body,
        json!({ "error": "Reconciliation failed: Unknown or disabled geocoding provider: Mapbox" })
    );
}

#[tokio::test]
async fn test_enabled_providers() {
    let app = common::app_helper::setup_app().await;
    let user = setup_authenticated_user(&app).await;

    let req = create_empty_request("GET", "/api/geocoding/providers", &user.access_token);
    let body = body_json(app.oneshot(req).await.unwrap()).await;

    let providers = body.as_array().unwrap();
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0]["name"], "Nominatim");
    assert_eq!(providers[0]["isPrimary"], true);
    assert_eq!(providers[1]["isFallback"], true);
}
