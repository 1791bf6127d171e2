// src/api/handlers/friend_handler.rs
use crate::api::dto::friend_dto::*;
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

pub async fn invite_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<InviteFriendDto>,
) -> AppResult<impl IntoResponse> {
    let invitation = app_state
        .friend_service
        .invite(user.user_id(), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(invitation))))
}

pub async fn received_invitations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<FriendInvitationDto>>>> {
    let invitations = app_state
        .friend_service
        .received_invitations(user.user_id())
        .await?;
    Ok(Json(ApiResponse::success(invitations)))
}

pub async fn sent_invitations_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<FriendInvitationDto>>>> {
    let invitations = app_state
        .friend_service
        .sent_invitations(user.user_id())
        .await?;
    Ok(Json(ApiResponse::success(invitations)))
}

pub async fn accept_invitation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Json<ApiResponse<FriendInvitationDto>>> {
    let invitation = app_state
        .friend_service
        .accept_invitation(user.user_id(), id)
        .await?;

    Ok(Json(ApiResponse::success(invitation)))
}

pub async fn reject_invitation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Json<ApiResponse<FriendInvitationDto>>> {
    let invitation = app_state
        .friend_service
        .reject_invitation(user.user_id(), id)
        .await?;

    Ok(Json(ApiResponse::success(invitation)))
}

pub async fn cancel_invitation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(id): ValidatedUuid,
) -> AppResult<Json<ApiResponse<FriendInvitationDto>>> {
    let invitation = app_state
        .friend_service
        .cancel_invitation(user.user_id(), id)
        .await?;

    Ok(Json(ApiResponse::success(invitation)))
}

pub async fn list_friends_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<FriendDto>>>> {
    let friends = app_state.friend_service.list_friends(user.user_id()).await?;
    Ok(Json(ApiResponse::success(friends)))
}

pub async fn remove_friend_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(friend_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    app_state
        .friend_service
        .remove_friend(user.user_id(), friend_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub fn friend_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/friends", get(list_friends_handler))
        .route("/api/friends/{id}", delete(remove_friend_handler))
        .route("/api/friends/invitations", post(invite_handler))
        .route(
            "/api/friends/invitations/received",
            get(received_invitations_handler),
        )
        .route(
            "/api/friends/invitations/sent",
            get(sent_invitations_handler),
        )
        .route(
            "/api/friends/invitations/{id}",
            delete(cancel_invitation_handler),
        )
        .route(
            "/api/friends/invitations/{id}/accept",
            post(accept_invitation_handler),
        )
        .route(
            "/api/friends/invitations/{id}/reject",
            post(reject_invitation_handler),
        )
        .with_state(app_state)
}
