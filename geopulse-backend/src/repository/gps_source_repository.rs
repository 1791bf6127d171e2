// src/repository/gps_source_repository.rs

use crate::domain::gps_source_config_model::{
    self, ActiveModel as GpsSourceActiveModel, Entity as GpsSourceEntity,
};
use crate::domain::gps_source_type::GpsSourceType;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use uuid::Uuid;

pub struct GpsSourceRepository {
    db: DbConn,
}

/// Fields of a new source; credentials are already hashed/generated by the service.
pub struct NewGpsSource {
    pub user_id: Uuid,
    pub source_type: GpsSourceType,
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub token: Option<String>,
}

impl GpsSourceRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_all_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<gps_source_config_model::Model>, DbErr> {
        GpsSourceEntity::find()
            .filter(gps_source_config_model::Column::UserId.eq(user_id))
            .order_by_asc(gps_source_config_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<gps_source_config_model::Model>, DbErr> {
        GpsSourceEntity::find_by_id(id)
            .filter(gps_source_config_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    pub async fn find_active_owntracks_by_username(
        &self,
        username: &str,
    ) -> Result<Option<gps_source_config_model::Model>, DbErr> {
        GpsSourceEntity::find()
            .filter(
                Condition::all()
                    .add(
                        gps_source_config_model::Column::SourceType
                            .eq(GpsSourceType::Owntracks.as_str()),
                    )
                    .add(gps_source_config_model::Column::Username.eq(username))
                    .add(gps_source_config_model::Column::Active.eq(true)),
            )
            .one(&self.db)
            .await
    }

    pub async fn find_active_overland_by_token(
        &self,
        token: &str,
    ) -> Result<Option<gps_source_config_model::Model>, DbErr> {
        GpsSourceEntity::find()
            .filter(
                Condition::all()
                    .add(
                        gps_source_config_model::Column::SourceType
                            .eq(GpsSourceType::Overland.as_str()),
                    )
                    .add(gps_source_config_model::Column::Token.eq(token))
                    .add(gps_source_config_model::Column::Active.eq(true)),
            )
            .one(&self.db)
            .await
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, DbErr> {
        let count = GpsSourceEntity::find()
            .filter(gps_source_config_model::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn token_exists(&self, token: &str) -> Result<bool, DbErr> {
        let count = GpsSourceEntity::find()
            .filter(gps_source_config_model::Column::Token.eq(token))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        &self,
        source: NewGpsSource,
    ) -> Result<gps_source_config_model::Model, DbErr> {
        let model = GpsSourceActiveModel {
            user_id: Set(source.user_id),
            source_type: Set(source.source_type.as_str().to_string()),
            username: Set(source.username),
            password_hash: Set(source.password_hash),
            token: Set(source.token),
            ..Default::default()
        };
        model.insert(&self.db).await
    }

    pub async fn set_active(
        &self,
        user_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Option<gps_source_config_model::Model>, DbErr> {
        let Some(source) = self.find_by_id_for_user(user_id, id).await? else {
            return Ok(None);
        };
        let mut active_model: GpsSourceActiveModel = source.into();
        active_model.active = Set(active);
        active_model.update(&self.db).await.map(Some)
    }

    pub async fn delete_for_user(&self, user_id: Uuid, id: Uuid) -> Result<u64, DbErr> {
        let result = GpsSourceEntity::delete_many()
            .filter(gps_source_config_model::Column::Id.eq(id))
            .filter(gps_source_config_model::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
