// src/repository/user_repository.rs

use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use uuid::Uuid;

pub struct UserRepository {
    db: DbConn,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// Emails are stored lowercased, so the lookup normalizes its input the same way.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<user_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        UserEntity::find()
            .filter(user_model::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(user_model::Column::FullName)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        email: &str,
        full_name: &str,
        password_hash: String,
    ) -> Result<user_model::Model, DbErr> {
        let user = UserActiveModel {
            email: Set(email.trim().to_lowercase()),
            full_name: Set(full_name.trim().to_string()),
            password_hash: Set(password_hash),
            ..Default::default()
        };
        user.insert(&self.db).await
    }
}
