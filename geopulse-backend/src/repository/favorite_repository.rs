// src/repository/favorite_repository.rs

use crate::domain::favorite_location_model::{
    self, ActiveModel as FavoriteActiveModel, Entity as FavoriteEntity,
};
use crate::domain::favorite_type::FavoriteType;
use crate::repository::contains_pattern;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use uuid::Uuid;

pub struct FavoriteRepository {
    db: DbConn,
}

#[derive(Debug, Clone)]
pub enum NewFavoriteShape {
    Point {
        latitude: f64,
        longitude: f64,
    },
    Area {
        north_east_lat: f64,
        north_east_lon: f64,
        south_west_lat: f64,
        south_west_lon: f64,
    },
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub name: String,
    pub shape: NewFavoriteShape,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl FavoriteRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Favorites of a user, optionally narrowed by a case-insensitive match on name, city or country.
    pub async fn find_all_for_user(
        &self,
        user_id: Uuid,
        search: Option<&str>,
    ) -> Result<Vec<favorite_location_model::Model>, DbErr> {
        let mut conditions =
            Condition::all().add(favorite_location_model::Column::UserId.eq(user_id));

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = contains_pattern(&search.to_lowercase());
            conditions = conditions.add(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(favorite_location_model::Column::Name)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(favorite_location_model::Column::City)))
                            .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(
                            favorite_location_model::Column::Country,
                        )))
                        .like(pattern),
                    ),
            );
        }

        FavoriteEntity::find()
            .filter(conditions)
            .order_by_asc(favorite_location_model::Column::Name)
            .order_by_asc(favorite_location_model::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn find_by_id_for_user(
        &self,
        user_id: Uuid,
        id: i64,
    ) -> Result<Option<favorite_location_model::Model>, DbErr> {
        FavoriteEntity::find_by_id(id)
            .filter(favorite_location_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    pub async fn create(
        &self,
        favorite: NewFavorite,
    ) -> Result<favorite_location_model::Model, DbErr> {
        let mut model = FavoriteActiveModel {
            user_id: Set(favorite.user_id),
            name: Set(favorite.name),
            city: Set(favorite.city),
            country: Set(favorite.country),
            created_at: Set(Utc::now()),
            latitude: Set(None),
            longitude: Set(None),
            north_east_lat: Set(None),
            north_east_lon: Set(None),
            south_west_lat: Set(None),
            south_west_lon: Set(None),
            ..Default::default()
        };

        match favorite.shape {
            NewFavoriteShape::Point {
                latitude,
                longitude,
            } => {
                model.favorite_type = Set(FavoriteType::Point.as_str().to_string());
                model.latitude = Set(Some(latitude));
                model.longitude = Set(Some(longitude));
            }
            NewFavoriteShape::Area {
                north_east_lat,
                north_east_lon,
                south_west_lat,
                south_west_lon,
            } => {
                model.favorite_type = Set(FavoriteType::Area.as_str().to_string());
                model.north_east_lat = Set(Some(north_east_lat));
                model.north_east_lon = Set(Some(north_east_lon));
                model.south_west_lat = Set(Some(south_west_lat));
                model.south_west_lon = Set(Some(south_west_lon));
            }
        }

        model.insert(&self.db).await
    }

    pub async fn rename(
        &self,
        user_id: Uuid,
        id: i64,
        name: String,
    ) -> Result<Option<favorite_location_model::Model>, DbErr> {
        let Some(favorite) = self.find_by_id_for_user(user_id, id).await? else {
            return Ok(None);
        };
        let mut active_model: FavoriteActiveModel = favorite.into();
        active_model.name = Set(name);
        active_model.update(&self.db).await.map(Some)
    }

    pub async fn delete_for_user(&self, user_id: Uuid, id: i64) -> Result<u64, DbErr> {
        let result = FavoriteEntity::delete_many()
            .filter(favorite_location_model::Column::Id.eq(id))
            .filter(favorite_location_model::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
