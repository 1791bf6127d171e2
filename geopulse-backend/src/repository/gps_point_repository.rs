// src/repository/gps_point_repository.rs

use crate::domain::gps_point_model::{self, ActiveModel as GpsPointActiveModel, Entity as GpsPointEntity};
use crate::domain::gps_source_type::GpsSourceType;
use crate::utils::geo::BoundingBox;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::*, query::*, DbConn, DbErr, Set};
use uuid::Uuid;

pub struct GpsPointRepository {
    db: DbConn,
}

/// A location sample decoded from a tracking app payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewGpsPoint {
    pub device_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub battery: Option<f64>,
}

impl GpsPointRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Inserts the point unless the user already has one at the same timestamp.
    /// Returns whether a row was written. Conflicts on the unique
    /// (user, timestamp) index are skipped, not reported.
    pub async fn insert_if_absent(
        &self,
        user_id: Uuid,
        source_type: GpsSourceType,
        point: NewGpsPoint,
    ) -> Result<bool, DbErr> {
        let model = GpsPointActiveModel {
            user_id: Set(user_id),
            device_id: Set(point.device_id),
            source_type: Set(source_type.as_str().to_string()),
            timestamp: Set(point.timestamp),
            latitude: Set(point.latitude),
            longitude: Set(point.longitude),
            accuracy: Set(point.accuracy),
            altitude: Set(point.altitude),
            velocity: Set(point.velocity),
            battery: Set(point.battery),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let inserted = GpsPointEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    gps_point_model::Column::UserId,
                    gps_point_model::Column::Timestamp,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(inserted > 0)
    }

    pub async fn find_latest_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<gps_point_model::Model>, DbErr> {
        GpsPointEntity::find()
            .filter(gps_point_model::Column::UserId.eq(user_id))
            .order_by_desc(gps_point_model::Column::Timestamp)
            .one(&self.db)
            .await
    }

    /// Points within `[from, to]`, oldest first
    pub async fn find_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<gps_point_model::Model>, DbErr> {
        GpsPointEntity::find()
            .filter(gps_point_model::Column::UserId.eq(user_id))
            .filter(gps_point_model::Column::Timestamp.gte(from))
            .filter(gps_point_model::Column::Timestamp.lte(to))
            .order_by_asc(gps_point_model::Column::Timestamp)
            .all(&self.db)
            .await
    }

    pub async fn find_paginated_for_user(
        &self,
        user_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<gps_point_model::Model>, u64), DbErr> {
        let mut conditions = Condition::all().add(gps_point_model::Column::UserId.eq(user_id));
        if let Some(from) = from {
            conditions = conditions.add(gps_point_model::Column::Timestamp.gte(from));
        }
        if let Some(to) = to {
            conditions = conditions.add(gps_point_model::Column::Timestamp.lte(to));
        }

        let query = GpsPointEntity::find().filter(conditions);
        let total = query.clone().count(&self.db).await?;

        let points = query
            .order_by_desc(gps_point_model::Column::Timestamp)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok((points, total))
    }

    /// Up to `limit` points recorded after `after`, oldest first, optionally
    /// restricted to `within`. Timestamps are unique per user, so the last
    /// timestamp of a batch is the cursor for the next one.
    pub async fn find_track_batch(
        &self,
        user_id: Uuid,
        within: Option<&BoundingBox>,
        after: Option<DateTime<Utc>>,
        limit: u64,
    ) -> Result<Vec<gps_point_model::Model>, DbErr> {
        let mut conditions = Condition::all().add(gps_point_model::Column::UserId.eq(user_id));
        if let Some(after) = after {
            conditions = conditions.add(gps_point_model::Column::Timestamp.gt(after));
        }
        if let Some(bbox) = within {
            conditions = conditions.add(bounding_box_condition(bbox));
        }

        GpsPointEntity::find()
            .filter(conditions)
            .order_by_asc(gps_point_model::Column::Timestamp)
            .limit(limit)
            .all(&self.db)
            .await
    }
}

fn bounding_box_condition(bbox: &BoundingBox) -> Condition {
    use gps_point_model::Column;

    let longitude = if bbox.west <= bbox.east {
        Condition::all().add(Column::Longitude.between(bbox.west, bbox.east))
    } else {
        // box crosses the antimeridian
        Condition::any()
            .add(Column::Longitude.gte(bbox.west))
            .add(Column::Longitude.lte(bbox.east))
    };

    Condition::all()
        .add(Column::Latitude.between(bbox.south, bbox.north))
        .add(longitude)
}
