// src/api/handlers/gps_handler.rs
use crate::api::dto::gps_dto::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::{bearer_token, AuthenticatedUser};
use crate::types::ApiResponse;
use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use axum_extra::headers::{authorization::Basic, Authorization, HeaderMapExt};
use serde_json::{json, Value};
use tracing::warn;

// --- GPS source configuration ---

pub async fn list_sources_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<GpsSourceDto>>>> {
    let sources = app_state
        .gps_source_service
        .list_sources(user.user_id())
        .await?;
    Ok(Json(ApiResponse::success(sources)))
}

pub async fn create_source_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateGpsSourceDto>,
) -> AppResult<impl IntoResponse> {
    let source = app_state
        .gps_source_service
        .create_source(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(source))))
}

pub async fn update_source_status_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateGpsSourceStatusDto>,
) -> AppResult<Json<ApiResponse<GpsSourceDto>>> {
    let source = app_state
        .gps_source_service
        .set_source_active(user.user_id(), id, payload.active)
        .await?;

    Ok(Json(ApiResponse::success(source)))
}

pub async fn delete_source_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    app_state
        .gps_source_service
        .delete_source(user.user_id(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_points_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<GpsPointsQuery>,
) -> AppResult<Json<ApiResponse<GpsPointPageDto>>> {
    let page = app_state
        .gps_point_service
        .list_points(user.user_id(), query)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}

// --- Device ingestion ---

/// OwnTracks HTTP mode. Answers with an empty JSON array as the app expects.
pub async fn owntracks_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OwnTracksPayload>,
) -> AppResult<Json<Value>> {
    let credentials = headers
        .typed_get::<Authorization<Basic>>()
        .ok_or_else(|| {
            warn!("OwnTracks request without Basic credentials");
            AppError::Unauthorized("Missing OwnTracks credentials".to_string())
        })?;

    let source = app_state
        .gps_point_service
        .authenticate_owntracks(credentials.username(), credentials.password())
        .await?;

    app_state
        .gps_point_service
        .ingest_owntracks(&source, payload.into_messages())
        .await?;

    Ok(Json(json!([])))
}

/// Overland HTTP mode, token from `Authorization: Bearer` or `?token=`.
pub async fn overland_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OverlandTokenQuery>,
    Json(payload): Json<OverlandPayload>,
) -> AppResult<Json<Value>> {
    let token = bearer_token(&headers)
        .map(str::to_string)
        .or(query.token.filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| {
            warn!("Overland request without token");
            AppError::Unauthorized("Missing Overland token".to_string())
        })?;

    let source = app_state
        .gps_point_service
        .authenticate_overland(&token)
        .await?;

    app_state
        .gps_point_service
        .ingest_overland(&source, payload)
        .await?;

    Ok(Json(json!({ "result": "ok" })))
}

pub fn gps_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/gps/source",
            get(list_sources_handler).post(create_source_handler),
        )
        .route(
            "/api/gps/source/{id}/status",
            put(update_source_status_handler),
        )
        .route("/api/gps/source/{id}", delete(delete_source_handler))
        .route("/api/gps/points", get(list_points_handler))
        .route("/api/owntracks", post(owntracks_handler))
        .route("/api/overland", post(overland_handler))
        .with_state(app_state)
}
