// src/api/handlers/favorite_handler.rs
use crate::api::dto::favorite_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedId;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};

pub async fn list_favorites_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<FavoriteSearchQuery>,
) -> AppResult<Json<ApiResponse<FavoriteLocationsDto>>> {
    let favorites = app_state
        .favorite_service
        .get_favorites(user.user_id(), query.search.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(favorites)))
}

pub async fn add_point_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddPointFavoriteDto>,
) -> AppResult<impl IntoResponse> {
    let favorite = app_state
        .favorite_service
        .add_point(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(favorite))))
}

pub async fn add_area_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddAreaFavoriteDto>,
) -> AppResult<impl IntoResponse> {
    let favorite = app_state
        .favorite_service
        .add_area(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(favorite))))
}

pub async fn rename_favorite_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedId(id): ValidatedId,
    Json(payload): Json<EditFavoriteDto>,
) -> AppResult<Json<ApiResponse<FavoriteDto>>> {
    let favorite = app_state
        .favorite_service
        .rename(user.user_id(), id, payload)
        .await?;

    Ok(Json(ApiResponse::success(favorite)))
}

pub async fn delete_favorite_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedId(id): ValidatedId,
) -> AppResult<StatusCode> {
    app_state
        .favorite_service
        .delete(user.user_id(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn favorite_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/favorites", get(list_favorites_handler))
        .route("/api/favorites/point", post(add_point_handler))
        .route("/api/favorites/area", post(add_area_handler))
        .route(
            "/api/favorites/{id}",
            put(rename_favorite_handler).delete(delete_favorite_handler),
        )
        .with_state(app_state)
}
