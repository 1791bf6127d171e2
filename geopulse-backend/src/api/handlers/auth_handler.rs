// src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

pub async fn register_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let response = app_state.auth_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

pub async fn login_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let response = app_state.auth_service.login(payload).await?;

    Ok(Json(ApiResponse::success(response)))
}

pub async fn me_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<UserDto>>> {
    let profile = app_state.auth_service.current_user(user.user_id()).await?;
    Ok(Json(ApiResponse::success(profile)))
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        .with_state(app_state)
}
