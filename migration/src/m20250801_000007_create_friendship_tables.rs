use sea_orm_migration::prelude::*;

use crate::m20250801_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FriendInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FriendInvitations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FriendInvitations::SenderId).uuid().not_null())
                    .col(
                        ColumnDef::new(FriendInvitations::ReceiverId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FriendInvitations::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(FriendInvitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_invitations_sender_id")
                            .from(FriendInvitations::Table, FriendInvitations::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_friend_invitations_receiver_id")
                            .from(FriendInvitations::Table, FriendInvitations::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserFriends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserFriends::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(UserFriends::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserFriends::FriendId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserFriends::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_friends_user_id")
                            .from(UserFriends::Table, UserFriends::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_friends_friend_id")
                            .from(UserFriends::Table, UserFriends::FriendId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(UserFriends::Table)
                    .name("idx_user_friends_pair")
                    .col(UserFriends::UserId)
                    .col(UserFriends::FriendId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserFriends::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FriendInvitations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FriendInvitations {
    Table,
    Id,
    SenderId,
    ReceiverId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserFriends {
    Table,
    Id,
    UserId,
    FriendId,
    CreatedAt,
}
