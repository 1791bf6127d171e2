// src/repository/friend_repository.rs

use crate::domain::friend_invitation_model::{
    self, ActiveModel as InvitationActiveModel, Entity as InvitationEntity,
};
use crate::domain::invitation_status::InvitationStatus;
use crate::domain::user_friend_model::{
    self, ActiveModel as UserFriendActiveModel, Entity as UserFriendEntity,
};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set, TransactionTrait};
use uuid::Uuid;

pub struct FriendRepository {
    db: DbConn,
}

impl FriendRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_invitation(
        &self,
        id: Uuid,
    ) -> Result<Option<friend_invitation_model::Model>, DbErr> {
        InvitationEntity::find_by_id(id).one(&self.db).await
    }

    /// Pending invitation between the two users in either direction
    pub async fn find_pending_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<friend_invitation_model::Model>, DbErr> {
        use friend_invitation_model::Column;

        InvitationEntity::find()
            .filter(Column::Status.eq(InvitationStatus::Pending.as_str()))
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(user_a))
                            .add(Column::ReceiverId.eq(user_b)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::SenderId.eq(user_b))
                            .add(Column::ReceiverId.eq(user_a)),
                    ),
            )
            .one(&self.db)
            .await
    }

    pub async fn find_pending_received(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<friend_invitation_model::Model>, DbErr> {
        InvitationEntity::find()
            .filter(friend_invitation_model::Column::ReceiverId.eq(user_id))
            .filter(friend_invitation_model::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .order_by_desc(friend_invitation_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn find_pending_sent(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<friend_invitation_model::Model>, DbErr> {
        InvitationEntity::find()
            .filter(friend_invitation_model::Column::SenderId.eq(user_id))
            .filter(friend_invitation_model::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .order_by_desc(friend_invitation_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn create_invitation(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
    ) -> Result<friend_invitation_model::Model, DbErr> {
        let model = InvitationActiveModel {
            sender_id: Set(sender_id),
            receiver_id: Set(receiver_id),
            ..Default::default()
        };
        model.insert(&self.db).await
    }

    pub async fn set_invitation_status(
        &self,
        invitation: friend_invitation_model::Model,
        status: InvitationStatus,
    ) -> Result<friend_invitation_model::Model, DbErr> {
        let mut active_model: InvitationActiveModel = invitation.into();
        active_model.status = Set(status.as_str().to_string());
        active_model.update(&self.db).await
    }

    /// Marks the invitation accepted and writes both friendship rows atomically.
    pub async fn accept_invitation(
        &self,
        invitation: friend_invitation_model::Model,
    ) -> Result<friend_invitation_model::Model, DbErr> {
        let txn = self.db.begin().await?;

        let sender_id = invitation.sender_id;
        let receiver_id = invitation.receiver_id;

        let mut active_model: InvitationActiveModel = invitation.into();
        active_model.status = Set(InvitationStatus::Accepted.as_str().to_string());
        let accepted = active_model.update(&txn).await?;

        for (user_id, friend_id) in [(sender_id, receiver_id), (receiver_id, sender_id)] {
            let row = UserFriendActiveModel {
                user_id: Set(user_id),
                friend_id: Set(friend_id),
                ..Default::default()
            };
            row.insert(&txn).await?;
        }

        txn.commit().await?;
        Ok(accepted)
    }

    pub async fn are_friends(&self, user_id: Uuid, friend_id: Uuid) -> Result<bool, DbErr> {
        let count = UserFriendEntity::find()
            .filter(user_friend_model::Column::UserId.eq(user_id))
            .filter(user_friend_model::Column::FriendId.eq(friend_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_friend_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        UserFriendEntity::find()
            .select_only()
            .column(user_friend_model::Column::FriendId)
            .filter(user_friend_model::Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
    }

    /// Deletes both directions; returns the number of rows removed.
    pub async fn remove_friendship(&self, user_id: Uuid, friend_id: Uuid) -> Result<u64, DbErr> {
        use user_friend_model::Column;

        let result = UserFriendEntity::delete_many()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(Column::UserId.eq(user_id))
                            .add(Column::FriendId.eq(friend_id)),
                    )
                    .add(
                        Condition::all()
                            .add(Column::UserId.eq(friend_id))
                            .add(Column::FriendId.eq(user_id)),
                    ),
            )
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
