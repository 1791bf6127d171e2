// src/domain/user_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub email: String,

    pub full_name: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::gps_point_model::Entity")]
    GpsPoints,

    #[sea_orm(has_many = "crate::domain::favorite_location_model::Entity")]
    FavoriteLocations,

    #[sea_orm(has_many = "crate::domain::shared_link_model::Entity")]
    SharedLinks,
}

impl Related<crate::domain::gps_point_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GpsPoints.def()
    }
}

impl Related<crate::domain::favorite_location_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteLocations.def()
    }
}

impl Related<crate::domain::shared_link_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SharedLinks.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            role: Set(ROLE_USER.to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

/// User information embedded in access tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserClaims {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

impl UserClaims {
    pub fn has_user_role(&self) -> bool {
        self.role == ROLE_USER || self.role == ROLE_ADMIN
    }
}

impl From<&Model> for UserClaims {
    fn from(user: &Model) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role.clone(),
        }
    }
}
