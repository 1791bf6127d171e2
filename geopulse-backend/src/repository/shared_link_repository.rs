// src/repository/shared_link_repository.rs

use crate::domain::shared_link_model::{
    self, ActiveModel as SharedLinkActiveModel, Entity as SharedLinkEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use uuid::Uuid;

pub struct SharedLinkRepository {
    db: DbConn,
}

#[derive(Debug, Clone)]
pub struct NewSharedLink {
    pub user_id: Uuid,
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub password_hash: Option<String>,
    pub show_history: bool,
    pub history_hours: i32,
}

/// Field changes; `password_hash: Some(None)` removes the password.
#[derive(Debug, Clone, Default)]
pub struct SharedLinkChanges {
    pub name: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
    pub password_hash: Option<Option<String>>,
    pub show_history: Option<bool>,
    pub history_hours: Option<i32>,
    pub is_active: Option<bool>,
}

impl SharedLinkRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<shared_link_model::Model>, DbErr> {
        SharedLinkEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<shared_link_model::Model>, DbErr> {
        SharedLinkEntity::find_by_id(id)
            .filter(shared_link_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    pub async fn find_all_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<shared_link_model::Model>, DbErr> {
        SharedLinkEntity::find()
            .filter(shared_link_model::Column::UserId.eq(user_id))
            .order_by_desc(shared_link_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Active links that have not expired at `now`
    pub async fn count_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        SharedLinkEntity::find()
            .filter(shared_link_model::Column::UserId.eq(user_id))
            .filter(shared_link_model::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(shared_link_model::Column::ExpiresAt.is_null())
                    .add(shared_link_model::Column::ExpiresAt.gt(now)),
            )
            .count(&self.db)
            .await
    }

    pub async fn create(&self, link: NewSharedLink) -> Result<shared_link_model::Model, DbErr> {
        let model = SharedLinkActiveModel {
            user_id: Set(link.user_id),
            name: Set(link.name),
            expires_at: Set(link.expires_at),
            password_hash: Set(link.password_hash),
            show_history: Set(link.show_history),
            history_hours: Set(link.history_hours),
            ..Default::default()
        };
        model.insert(&self.db).await
    }

    pub async fn update(
        &self,
        link: shared_link_model::Model,
        changes: SharedLinkChanges,
    ) -> Result<shared_link_model::Model, DbErr> {
        let mut active_model: SharedLinkActiveModel = link.into();

        if let Some(name) = changes.name {
            active_model.name = Set(name);
        }
        if let Some(expires_at) = changes.expires_at {
            active_model.expires_at = Set(expires_at);
        }
        if let Some(password_hash) = changes.password_hash {
            active_model.password_hash = Set(password_hash);
        }
        if let Some(show_history) = changes.show_history {
            active_model.show_history = Set(show_history);
        }
        if let Some(history_hours) = changes.history_hours {
            active_model.history_hours = Set(history_hours);
        }
        if let Some(is_active) = changes.is_active {
            active_model.is_active = Set(is_active);
        }

        active_model.update(&self.db).await
    }

    pub async fn increment_view_count(&self, id: Uuid) -> Result<(), DbErr> {
        SharedLinkEntity::update_many()
            .col_expr(
                shared_link_model::Column::ViewCount,
                Expr::col(shared_link_model::Column::ViewCount).add(1),
            )
            .filter(shared_link_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<u64, DbErr> {
        let result = SharedLinkEntity::delete_many()
            .filter(shared_link_model::Column::Id.eq(id))
            .filter(shared_link_model::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
