// src/service/gps_point_service.rs

use crate::api::dto::gps_dto::{
    GpsPointDto, GpsPointPageDto, GpsPointsQuery, OverlandLocation, OverlandPayload,
    OwnTracksMessage,
};
use crate::db::DbPool;
use crate::domain::gps_source_config_model;
use crate::domain::gps_source_type::GpsSourceType;
use crate::error::{AppError, AppResult};
use crate::repository::gps_point_repository::{GpsPointRepository, NewGpsPoint};
use crate::repository::gps_source_repository::GpsSourceRepository;
use crate::service::auth_service::password_error;
use crate::types::{PageRequest, PaginationMeta};
use crate::utils::password::PasswordManager;
use crate::utils::validation::{is_valid_latitude, is_valid_longitude};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const OWNTRACKS_LOCATION_TYPE: &str = "location";
const METERS_PER_SECOND_TO_KMH: f64 = 3.6;

pub struct GpsPointService {
    point_repo: Arc<GpsPointRepository>,
    source_repo: Arc<GpsSourceRepository>,
    password_manager: Arc<PasswordManager>,
}

impl GpsPointService {
    pub fn new(db_pool: DbPool, password_manager: Arc<PasswordManager>) -> Self {
        Self {
            point_repo: Arc::new(GpsPointRepository::new(db_pool.clone())),
            source_repo: Arc::new(GpsSourceRepository::new(db_pool)),
            password_manager,
        }
    }

    /// Matches HTTP Basic credentials against an active OwnTracks source.
    pub async fn authenticate_owntracks(
        &self,
        username: &str,
        password: &str,
    ) -> AppResult<gps_source_config_model::Model> {
        let unauthorized = || AppError::Unauthorized("Invalid OwnTracks credentials".to_string());

        let source = self
            .source_repo
            .find_active_owntracks_by_username(username)
            .await?
            .ok_or_else(unauthorized)?;
        let hash = source.password_hash.as_deref().ok_or_else(unauthorized)?;

        if !self
            .password_manager
            .verify_password(password, hash)
            .map_err(password_error)?
        {
            warn!(username, "OwnTracks authentication failed");
            return Err(unauthorized());
        }
        Ok(source)
    }

    pub async fn authenticate_overland(
        &self,
        token: &str,
    ) -> AppResult<gps_source_config_model::Model> {
        self.source_repo
            .find_active_overland_by_token(token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid Overland token".to_string()))
    }

    /// Stores location messages; returns how many new points were written.
    pub async fn ingest_owntracks(
        &self,
        source: &gps_source_config_model::Model,
        messages: Vec<OwnTracksMessage>,
    ) -> AppResult<usize> {
        let points: Vec<NewGpsPoint> = messages
            .iter()
            .filter(|m| m.message_type == OWNTRACKS_LOCATION_TYPE)
            .filter_map(owntracks_to_point)
            .collect();

        self.store(source.user_id, GpsSourceType::Owntracks, points)
            .await
    }

    pub async fn ingest_overland(
        &self,
        source: &gps_source_config_model::Model,
        payload: OverlandPayload,
    ) -> AppResult<usize> {
        let points: Vec<NewGpsPoint> = payload
            .locations
            .iter()
            .filter_map(overland_to_point)
            .collect();

        self.store(source.user_id, GpsSourceType::Overland, points)
            .await
    }

    async fn store(
        &self,
        user_id: Uuid,
        source_type: GpsSourceType,
        points: Vec<NewGpsPoint>,
    ) -> AppResult<usize> {
        let received = points.len();
        let mut stored = 0;
        for point in points {
            if self
                .point_repo
                .insert_if_absent(user_id, source_type, point)
                .await?
            {
                stored += 1;
            }
        }

        info!(
            user_id = %user_id,
            source_type = %source_type,
            received,
            stored,
            "GPS points ingested"
        );
        Ok(stored)
    }

    pub async fn list_points(
        &self,
        user_id: Uuid,
        query: GpsPointsQuery,
    ) -> AppResult<GpsPointPageDto> {
        let page = PageRequest::from_query(
            query.page,
            query.limit,
            crate::api::dto::gps_dto::DEFAULT_POINTS_PAGE_SIZE,
        )?;
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AppError::BadRequest(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }

        let (points, total) = self
            .point_repo
            .find_paginated_for_user(user_id, query.from, query.to, page.limit, page.offset())
            .await?;

        Ok(GpsPointPageDto {
            data: points.into_iter().map(GpsPointDto::from).collect(),
            pagination: PaginationMeta::new(page.page, page.limit, total),
        })
    }
}

fn coordinates_in_range(latitude: f64, longitude: f64) -> bool {
    let valid = is_valid_latitude(latitude) && is_valid_longitude(longitude);
    if !valid {
        warn!(latitude, longitude, "Rejected GPS point with out-of-range coordinates");
    }
    valid
}

pub(crate) fn owntracks_to_point(message: &OwnTracksMessage) -> Option<NewGpsPoint> {
    let (Some(tst), Some(lat), Some(lon)) = (message.tst, message.lat, message.lon) else {
        debug!("OwnTracks location without tst/lat/lon skipped");
        return None;
    };
    if !coordinates_in_range(lat, lon) {
        return None;
    }

    Some(NewGpsPoint {
        device_id: message.tid.clone(),
        timestamp: Utc.timestamp_opt(tst, 0).single()?,
        latitude: lat,
        longitude: lon,
        accuracy: message.acc,
        altitude: message.alt,
        velocity: message.vel,
        battery: message.batt,
    })
}

pub(crate) fn overland_to_point(location: &OverlandLocation) -> Option<NewGpsPoint> {
    let coordinates = &location.geometry.as_ref()?.coordinates;
    let (lon, lat) = match coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => return None,
    };
    if !coordinates_in_range(lat, lon) {
        return None;
    }

    let props = &location.properties;
    let timestamp = props.timestamp.as_deref().and_then(parse_overland_timestamp)?;

    Some(NewGpsPoint {
        device_id: props.device_id.clone(),
        timestamp,
        latitude: lat,
        longitude: lon,
        accuracy: props.horizontal_accuracy,
        altitude: props.altitude,
        velocity: props
            .speed
            .filter(|s| *s >= 0.0)
            .map(|s| s * METERS_PER_SECOND_TO_KMH),
        battery: props.battery_level.map(|b| b * 100.0),
    })
}

/// Overland sends ISO-8601 with either `+07:00` or `+0700` offsets.
fn parse_overland_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::gps_dto::{OverlandGeometry, OverlandProperties};

    #[test]
    fn test_owntracks_location_is_converted() {
        let message = OwnTracksMessage {
            message_type: "location".to_string(),
            tst: Some(1_700_000_000),
            lat: Some(50.45),
            lon: Some(30.52),
            acc: Some(12.0),
            vel: Some(36.0),
            batt: Some(81.0),
            tid: Some("ph".to_string()),
            ..Default::default()
        };

        let point = owntracks_to_point(&message).unwrap();
        assert_eq!(point.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(point.velocity, Some(36.0));
        assert_eq!(point.device_id.as_deref(), Some("ph"));
    }

    #[test]
    fn test_owntracks_out_of_range_is_rejected() {
        let message = OwnTracksMessage {
            message_type: "location".to_string(),
            tst: Some(1_700_000_000),
            lat: Some(95.0),
            lon: Some(30.52),
            ..Default::default()
        };
        assert!(owntracks_to_point(&message).is_none());
    }

    #[test]
    fn test_overland_speed_is_converted_to_kmh() {
        let location = OverlandLocation {
            geometry: Some(OverlandGeometry {
                coordinates: vec![-122.03, 37.33],
            }),
            properties: OverlandProperties {
                timestamp: Some("2015-10-01T08:00:00-0700".to_string()),
                speed: Some(10.0),
                battery_level: Some(0.5),
                ..Default::default()
            },
        };

        let point = overland_to_point(&location).unwrap();
        assert_eq!(point.latitude, 37.33);
        assert_eq!(point.longitude, -122.03);
        assert_eq!(point.velocity, Some(36.0));
        assert_eq!(point.battery, Some(50.0));
        assert_eq!(point.timestamp.to_rfc3339(), "2015-10-01T15:00:00+00:00");
    }

    #[test]
    fn test_overland_timestamp_formats() {
        assert!(parse_overland_timestamp("2024-03-01T10:00:00Z").is_some());
        assert!(parse_overland_timestamp("2024-03-01T10:00:00+02:00").is_some());
        assert!(parse_overland_timestamp("yesterday").is_none());
    }
}
