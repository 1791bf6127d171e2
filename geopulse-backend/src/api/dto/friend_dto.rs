// src/api/dto/friend_dto.rs

use crate::domain::friend_invitation_model;
use crate::domain::user_model;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteFriendDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendUserDto {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

impl From<&user_model::Model> for FriendUserDto {
    fn from(user: &user_model::Model) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendInvitationDto {
    pub id: Uuid,
    pub sender: Option<FriendUserDto>,
    pub receiver: Option<FriendUserDto>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl FriendInvitationDto {
    pub fn new(
        invitation: friend_invitation_model::Model,
        sender: Option<&user_model::Model>,
        receiver: Option<&user_model::Model>,
    ) -> Self {
        Self {
            id: invitation.id,
            sender: sender.map(FriendUserDto::from),
            receiver: receiver.map(FriendUserDto::from),
            status: invitation.status,
            created_at: invitation.created_at,
        }
    }
}

/// A friend and their most recent known position
#[derive(Debug, Clone, Serialize)]
pub struct FriendDto {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub last_latitude: Option<f64>,
    pub last_longitude: Option<f64>,
    pub last_seen: Option<DateTime<Utc>>,
}
