// src/api/handlers/shared_link_handler.rs
use crate::api::dto::shared_link_dto::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::{bearer_token, AuthenticatedUser};
use crate::types::ApiResponse;
use axum::{
    extract::{Json, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;

/// `?token=` fallback for viewers that cannot set headers
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShareTokenQuery {
    pub token: Option<String>,
}

// --- Owner endpoints ---

pub async fn list_links_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<SharedLinkDto>>>> {
    let links = app_state
        .shared_link_service
        .list_links(user.user_id())
        .await?;
    Ok(Json(ApiResponse::success(links)))
}

pub async fn create_link_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateShareLinkDto>,
) -> AppResult<impl IntoResponse> {
    let link = app_state
        .shared_link_service
        .create_link(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(link))))
}

pub async fn update_link_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
    Json(payload): Json<UpdateShareLinkDto>,
) -> AppResult<Json<ApiResponse<SharedLinkDto>>> {
    let link = app_state
        .shared_link_service
        .update_link(user.user_id(), id, payload)
        .await?;

    Ok(Json(ApiResponse::success(link)))
}

pub async fn delete_link_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<StatusCode> {
    app_state
        .shared_link_service
        .delete_link(user.user_id(), id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// --- Public viewer endpoints ---

pub async fn link_info_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Json<ApiResponse<SharedLocationInfoDto>>> {
    let info = app_state.shared_link_service.get_info(id).await?;
    Ok(Json(ApiResponse::success(info)))
}

pub async fn verify_link_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    payload: Option<Json<VerifyShareLinkDto>>,
) -> AppResult<Json<ApiResponse<ShareAccessTokenDto>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let token = app_state
        .shared_link_service
        .verify_access(id, payload.password.as_deref())
        .await?;
    Ok(Json(ApiResponse::success(token)))
}

pub async fn shared_location_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(id): ValidatedUuid,
    headers: HeaderMap,
    Query(query): Query<ShareTokenQuery>,
) -> AppResult<Json<ApiResponse<SharedLocationDto>>> {
    let token = bearer_token(&headers)
        .map(str::to_string)
        .or(query.token.filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| AppError::Unauthorized("Missing access token".to_string()))?;

    let location = app_state
        .shared_link_service
        .get_shared_location(id, &token)
        .await?;
    Ok(Json(ApiResponse::success(location)))
}

pub fn shared_link_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/share-links",
            get(list_links_handler).post(create_link_handler),
        )
        .route(
            "/api/share-links/{id}",
            put(update_link_handler).delete(delete_link_handler),
        )
        .route("/api/shared/{id}/info", get(link_info_handler))
        .route("/api/shared/{id}/verify", post(verify_link_handler))
        .route("/api/shared/{id}/location", get(shared_location_handler))
        .with_state(app_state)
}
