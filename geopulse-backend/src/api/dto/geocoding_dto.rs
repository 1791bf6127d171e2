// src/api/dto/geocoding_dto.rs

use crate::domain::reverse_geocoding_location_model;
use crate::infrastructure::geocoding::registry::ProviderInfo;
use crate::types::PaginationMeta;
use crate::utils::validation::validate_not_blank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u64 = 50;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingListQuery {
    pub provider_name: Option<String>,
    pub search_text: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingDto {
    pub id: i64,
    pub request_latitude: f64,
    pub request_longitude: f64,
    pub result_latitude: f64,
    pub result_longitude: f64,
    /// Closed `[lon, lat]` ring, absent when the provider gave no bounds
    pub bounding_box: Option<Vec<[f64; 2]>>,
    pub display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub provider_name: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

impl From<reverse_geocoding_location_model::Model> for ReverseGeocodingDto {
    fn from(model: reverse_geocoding_location_model::Model) -> Self {
        Self {
            id: model.id,
            request_latitude: model.request_latitude,
            request_longitude: model.request_longitude,
            result_latitude: model.result_latitude,
            result_longitude: model.result_longitude,
            bounding_box: model.bounding_box().map(|bbox| bbox.to_polygon()),
            display_name: model.display_name,
            city: model.city,
            country: model.country,
            provider_name: model.provider_name,
            created_at: model.created_at,
            last_accessed_at: model.last_accessed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeocodingPageDto {
    pub data: Vec<ReverseGeocodingDto>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingUpdateDto {
    #[validate(
        custom(function = validate_not_blank, message = "Display name is required"),
        length(max = 1000, message = "Display name cannot exceed 1000 characters")
    )]
    pub display_name: String,

    #[validate(length(max = 200, message = "City cannot exceed 200 characters"))]
    pub city: Option<String>,

    #[validate(length(max = 200, message = "Country cannot exceed 200 characters"))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingReconcileRequest {
    #[validate(custom(function = validate_not_blank, message = "Provider name is required"))]
    pub provider_name: String,

    #[serde(default)]
    pub geocoding_ids: Vec<i64>,

    #[serde(default)]
    pub reconcile_all: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileFailureDto {
    pub geocoding_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodingReconcileResult {
    pub total_processed: u64,
    pub success_count: u64,
    pub failed_count: u64,
    pub errors: Vec<ReconcileFailureDto>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingProviderDto {
    pub name: String,
    pub display_name: String,
    pub enabled: bool,
    pub is_primary: bool,
    pub is_fallback: bool,
}

impl From<ProviderInfo> for GeocodingProviderDto {
    fn from(info: ProviderInfo) -> Self {
        Self {
            name: info.name,
            display_name: info.display_name,
            enabled: true,
            is_primary: info.is_primary,
            is_fallback: info.is_fallback,
        }
    }
}
