// src/api/dto/shared_link_dto.rs

use crate::domain::shared_link_model;
use crate::utils::validation::validate_not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_HISTORY_HOURS: i32 = 24;

/// Owner's view of a share link. Keys are serialized exactly as named here.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SharedLinkDto {
    pub id: Uuid,
    pub name: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub has_password: bool,
    pub show_history: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub view_count: i32,
}

impl From<shared_link_model::Model> for SharedLinkDto {
    fn from(link: shared_link_model::Model) -> Self {
        Self {
            has_password: link.has_password(),
            id: link.id,
            name: link.name,
            expires_at: link.expires_at,
            show_history: link.show_history,
            is_active: link.is_active,
            created_at: link.created_at,
            view_count: link.view_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShareLinkDto {
    #[validate(
        custom(function = validate_not_blank, message = "Link name cannot be empty"),
        length(max = 100, message = "Link name cannot exceed 100 characters")
    )]
    pub name: String,

    pub expires_at: Option<DateTime<Utc>>,

    #[validate(length(max = 128, message = "Password cannot exceed 128 characters"))]
    pub password: Option<String>,

    #[serde(default)]
    pub show_history: bool,

    #[validate(range(min = 1, max = 720, message = "History hours must be between 1 and 720"))]
    pub history_hours: Option<i32>,
}

/// Full replacement of a link's settings. `password: None` keeps the current one,
/// an empty string removes protection.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateShareLinkDto {
    #[validate(
        custom(function = validate_not_blank, message = "Link name cannot be empty"),
        length(max = 100, message = "Link name cannot exceed 100 characters")
    )]
    pub name: String,

    pub expires_at: Option<DateTime<Utc>>,

    #[validate(length(max = 128, message = "Password cannot exceed 128 characters"))]
    pub password: Option<String>,

    #[serde(default)]
    pub show_history: bool,

    #[validate(range(min = 1, max = 720, message = "History hours must be between 1 and 720"))]
    pub history_hours: Option<i32>,

    pub is_active: Option<bool>,
}

/// What an anonymous viewer learns before unlocking a link
#[derive(Debug, Clone, Serialize)]
pub struct SharedLocationInfoDto {
    pub id: Uuid,
    pub name: String,
    pub has_password: bool,
    pub show_history: bool,
    pub history_hours: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub shared_by: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct VerifyShareLinkDto {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShareAccessTokenDto {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LocationPointDto {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedLocationDto {
    pub current: Option<LocationPointDto>,
    pub history: Vec<LocationPointDto>,
}
