// src/api/dto/gps_dto.rs

use crate::domain::gps_point_model;
use crate::domain::gps_source_config_model;
use crate::types::PaginationMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_POINTS_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGpsSourceDto {
    /// `OWNTRACKS` or `OVERLAND`
    #[serde(rename = "type")]
    pub source_type: String,

    #[validate(length(min = 3, max = 100, message = "Username must be between 3 and 100 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 6, max = 128, message = "Password must be between 6 and 128 characters"))]
    pub password: Option<String>,

    #[validate(length(min = 16, max = 255, message = "Token must be between 16 and 255 characters"))]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGpsSourceStatusDto {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GpsSourceDto {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub source_type: String,
    pub username: Option<String>,
    pub token: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<gps_source_config_model::Model> for GpsSourceDto {
    fn from(model: gps_source_config_model::Model) -> Self {
        Self {
            id: model.id,
            source_type: model.source_type,
            username: model.username,
            token: model.token,
            active: model.active,
            created_at: model.created_at,
        }
    }
}

/// OwnTracks HTTP message. Only `_type == "location"` carries a position.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OwnTracksMessage {
    #[serde(rename = "_type", default)]
    pub message_type: String,
    /// epoch seconds
    pub tst: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub acc: Option<f64>,
    pub alt: Option<f64>,
    /// km/h
    pub vel: Option<f64>,
    pub batt: Option<f64>,
    pub tid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OwnTracksPayload {
    Batch(Vec<OwnTracksMessage>),
    Single(OwnTracksMessage),
}

impl OwnTracksPayload {
    pub fn into_messages(self) -> Vec<OwnTracksMessage> {
        match self {
            Self::Batch(messages) => messages,
            Self::Single(message) => vec![message],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlandPayload {
    #[serde(default)]
    pub locations: Vec<OverlandLocation>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlandLocation {
    #[serde(default)]
    pub geometry: Option<OverlandGeometry>,
    #[serde(default)]
    pub properties: OverlandProperties,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlandGeometry {
    /// `[lon, lat]`
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlandProperties {
    pub timestamp: Option<String>,
    pub altitude: Option<f64>,
    /// m/s
    pub speed: Option<f64>,
    pub horizontal_accuracy: Option<f64>,
    /// 0..1
    pub battery_level: Option<f64>,
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlandTokenQuery {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GpsPointsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GpsPointDto {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub velocity: Option<f64>,
    pub battery: Option<f64>,
    pub device_id: Option<String>,
    pub source_type: String,
}

impl From<gps_point_model::Model> for GpsPointDto {
    fn from(point: gps_point_model::Model) -> Self {
        Self {
            id: point.id,
            timestamp: point.timestamp,
            latitude: point.latitude,
            longitude: point.longitude,
            accuracy: point.accuracy,
            altitude: point.altitude,
            velocity: point.velocity,
            battery: point.battery,
            device_id: point.device_id,
            source_type: point.source_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GpsPointPageDto {
    pub data: Vec<GpsPointDto>,
    pub pagination: PaginationMeta,
}
