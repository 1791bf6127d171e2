// src/service/friend_service.rs

use crate::api::dto::friend_dto::{FriendDto, FriendInvitationDto, InviteFriendDto};
use crate::db::DbPool;
use crate::domain::friend_invitation_model;
use crate::domain::invitation_status::InvitationStatus;
use crate::domain::user_model;
use crate::error::{AppError, AppResult};
use crate::repository::friend_repository::FriendRepository;
use crate::repository::gps_point_repository::GpsPointRepository;
use crate::repository::user_repository::UserRepository;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct FriendService {
    repo: Arc<FriendRepository>,
    user_repo: Arc<UserRepository>,
    point_repo: Arc<GpsPointRepository>,
}

/// Which side of an invitation may perform an action
#[derive(Clone, Copy)]
enum Party {
    Sender,
    Receiver,
}

impl FriendService {
    pub fn new(db_pool: DbPool) -> Self {
        Self {
            repo: Arc::new(FriendRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            point_repo: Arc::new(GpsPointRepository::new(db_pool)),
        }
    }

    pub async fn invite(
        &self,
        user_id: Uuid,
        payload: InviteFriendDto,
    ) -> AppResult<FriendInvitationDto> {
        payload.validate()?;

        let receiver = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if receiver.id == user_id {
            return Err(AppError::BadRequest(
                "You cannot send a friend invitation to yourself".to_string(),
            ));
        }
        if self.repo.are_friends(user_id, receiver.id).await? {
            return Err(AppError::Conflict(
                "You are already friends with this user".to_string(),
            ));
        }
        if self
            .repo
            .find_pending_between(user_id, receiver.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A pending invitation already exists between you and this user".to_string(),
            ));
        }

        let invitation = self.repo.create_invitation(user_id, receiver.id).await?;
        info!(sender_id = %user_id, receiver_id = %receiver.id, invitation_id = %invitation.id, "Friend invitation sent");

        let sender = self.user_repo.find_by_id(user_id).await?;
        Ok(FriendInvitationDto::new(
            invitation,
            sender.as_ref(),
            Some(&receiver),
        ))
    }

    pub async fn received_invitations(&self, user_id: Uuid) -> AppResult<Vec<FriendInvitationDto>> {
        let invitations = self.repo.find_pending_received(user_id).await?;
        self.with_users(invitations).await
    }

    pub async fn sent_invitations(&self, user_id: Uuid) -> AppResult<Vec<FriendInvitationDto>> {
        let invitations = self.repo.find_pending_sent(user_id).await?;
        self.with_users(invitations).await
    }

    pub async fn accept_invitation(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
    ) -> AppResult<FriendInvitationDto> {
        let invitation = self
            .pending_invitation_for(user_id, invitation_id, Party::Receiver, InvitationStatus::Accepted)
            .await?;

        let accepted = if self
            .repo
            .are_friends(invitation.sender_id, invitation.receiver_id)
            .await?
        {
            self.repo
                .set_invitation_status(invitation, InvitationStatus::Accepted)
                .await?
        } else {
            self.repo.accept_invitation(invitation).await?
        };

        info!(user_id = %user_id, invitation_id = %invitation_id, friend_id = %accepted.sender_id, "Friend invitation accepted");
        self.single_with_users(accepted).await
    }

    pub async fn reject_invitation(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
    ) -> AppResult<FriendInvitationDto> {
        let invitation = self
            .pending_invitation_for(user_id, invitation_id, Party::Receiver, InvitationStatus::Rejected)
            .await?;
        let rejected = self
            .repo
            .set_invitation_status(invitation, InvitationStatus::Rejected)
            .await?;

        info!(user_id = %user_id, invitation_id = %invitation_id, "Friend invitation rejected");
        self.single_with_users(rejected).await
    }

    pub async fn cancel_invitation(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
    ) -> AppResult<FriendInvitationDto> {
        let invitation = self
            .pending_invitation_for(user_id, invitation_id, Party::Sender, InvitationStatus::Cancelled)
            .await?;
        let cancelled = self
            .repo
            .set_invitation_status(invitation, InvitationStatus::Cancelled)
            .await?;

        info!(user_id = %user_id, invitation_id = %invitation_id, "Friend invitation cancelled");
        self.single_with_users(cancelled).await
    }

    pub async fn list_friends(&self, user_id: Uuid) -> AppResult<Vec<FriendDto>> {
        let friend_ids = self.repo.find_friend_ids(user_id).await?;
        let friends = self.user_repo.find_by_ids(&friend_ids).await?;

        let mut result = Vec::with_capacity(friends.len());
        for friend in friends {
            let latest = self.point_repo.find_latest_for_user(friend.id).await?;
            result.push(FriendDto {
                user_id: friend.id,
                email: friend.email,
                full_name: friend.full_name,
                last_latitude: latest.as_ref().map(|p| p.latitude),
                last_longitude: latest.as_ref().map(|p| p.longitude),
                last_seen: latest.map(|p| p.timestamp),
            });
        }
        Ok(result)
    }

    pub async fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> AppResult<()> {
        if self.repo.remove_friendship(user_id, friend_id).await? == 0 {
            return Err(AppError::NotFound("Friend not found".to_string()));
        }
        info!(user_id = %user_id, friend_id = %friend_id, "Friend removed");
        Ok(())
    }

    async fn pending_invitation_for(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        party: Party,
        next: InvitationStatus,
    ) -> AppResult<friend_invitation_model::Model> {
        let invitation = self
            .repo
            .find_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        let (owner, action) = match party {
            Party::Sender => (invitation.sender_id, "cancel"),
            Party::Receiver => (invitation.receiver_id, next_action(next)),
        };
        if owner != user_id {
            // only the two parties may learn that the invitation exists
            if invitation.sender_id == user_id || invitation.receiver_id == user_id {
                return Err(AppError::Forbidden(format!(
                    "You are not allowed to {} this invitation",
                    action
                )));
            }
            return Err(AppError::NotFound("Invitation not found".to_string()));
        }

        let can_transition = invitation
            .status()
            .is_some_and(|status| status.can_transition_to(next));
        if !can_transition {
            return Err(AppError::BadRequest(
                "Invitation is no longer pending".to_string(),
            ));
        }
        Ok(invitation)
    }

    async fn with_users(
        &self,
        invitations: Vec<friend_invitation_model::Model>,
    ) -> AppResult<Vec<FriendInvitationDto>> {
        let mut ids: Vec<Uuid> = invitations
            .iter()
            .flat_map(|i| [i.sender_id, i.receiver_id])
            .collect();
        ids.sort_unstable();
        ids.dedup();

        let users: HashMap<Uuid, user_model::Model> = self
            .user_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(invitations
            .into_iter()
            .map(|invitation| {
                let sender = users.get(&invitation.sender_id);
                let receiver = users.get(&invitation.receiver_id);
                FriendInvitationDto::new(invitation, sender, receiver)
            })
            .collect())
    }

    async fn single_with_users(
        &self,
        invitation: friend_invitation_model::Model,
    ) -> AppResult<FriendInvitationDto> {
        let mut dtos = self.with_users(vec![invitation]).await?;
        dtos.pop()
            .ok_or_else(|| AppError::InternalServerError("Invitation vanished".to_string()))
    }
}

fn next_action(status: InvitationStatus) -> &'static str {
    match status {
        InvitationStatus::Rejected => "reject",
        InvitationStatus::Cancelled => "cancel",
        _ => "accept",
    }
}
