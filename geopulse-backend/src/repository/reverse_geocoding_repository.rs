// src/repository/reverse_geocoding_repository.rs

use crate::domain::reverse_geocoding_location_model::{
    self, ActiveModel as GeocodingActiveModel, Entity as GeocodingEntity,
};
use crate::infrastructure::geocoding::FormattableGeocodingResult;
use crate::repository::contains_pattern;
use crate::utils::geo::{degree_window, Coordinates};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{entity::*, query::*, DbConn, DbErr, Order, Set};

pub struct ReverseGeocodingRepository {
    db: DbConn,
}

/// Optional filters applied to the cached geocoding results listing
#[derive(Debug, Clone, Default)]
pub struct GeocodingResultFilter {
    pub provider_name: Option<String>,
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingSortField {
    Id,
    DisplayName,
    City,
    Country,
    ProviderName,
    CreatedAt,
    LastAccessedAt,
}

impl GeocodingSortField {
    /// Unknown names fall back to `lastAccessedAt`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("id") => Self::Id,
            Some("displayName") => Self::DisplayName,
            Some("city") => Self::City,
            Some("country") => Self::Country,
            Some("providerName") => Self::ProviderName,
            Some("createdAt") => Self::CreatedAt,
            _ => Self::LastAccessedAt,
        }
    }

    fn column(&self) -> reverse_geocoding_location_model::Column {
        use reverse_geocoding_location_model::Column;
        match self {
            Self::Id => Column::Id,
            Self::DisplayName => Column::DisplayName,
            Self::City => Column::City,
            Self::Country => Column::Country,
            Self::ProviderName => Column::ProviderName,
            Self::CreatedAt => Column::CreatedAt,
            Self::LastAccessedAt => Column::LastAccessedAt,
        }
    }
}

pub fn parse_sort_order(value: Option<&str>) -> Order {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("asc") => Order::Asc,
        _ => Order::Desc,
    }
}

impl ReverseGeocodingRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn filtered(filter: &GeocodingResultFilter) -> Select<GeocodingEntity> {
        use reverse_geocoding_location_model::Column;

        let mut conditions = Condition::all();

        if let Some(provider) = filter
            .provider_name
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
        {
            conditions = conditions.add(Column::ProviderName.eq(provider));
        }

        if let Some(text) = filter
            .search_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            let pattern = contains_pattern(&text.to_lowercase());
            conditions = conditions.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(Column::DisplayName))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(Column::City))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(Column::Country))).like(pattern)),
            );
        }

        GeocodingEntity::find().filter(conditions)
    }

    pub async fn find_page(
        &self,
        filter: &GeocodingResultFilter,
        limit: u64,
        offset: u64,
        sort_field: GeocodingSortField,
        sort_order: Order,
    ) -> Result<Vec<reverse_geocoding_location_model::Model>, DbErr> {
        let mut query = Self::filtered(filter).order_by(sort_field.column(), sort_order);
        if sort_field != GeocodingSortField::Id {
            // stable paging when the sort key has duplicates
            query = query.order_by_asc(reverse_geocoding_location_model::Column::Id);
        }

        query
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
    }

    pub async fn count(&self, filter: &GeocodingResultFilter) -> Result<u64, DbErr> {
        Self::filtered(filter).count(&self.db).await
    }

    pub async fn find_by_id(
        &self,
        id: i64,
    ) -> Result<Option<reverse_geocoding_location_model::Model>, DbErr> {
        GeocodingEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<reverse_geocoding_location_model::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        GeocodingEntity::find()
            .filter(reverse_geocoding_location_model::Column::Id.is_in(ids.iter().copied()))
            .order_by_asc(reverse_geocoding_location_model::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn find_all(&self) -> Result<Vec<reverse_geocoding_location_model::Model>, DbErr> {
        GeocodingEntity::find()
            .order_by_asc(reverse_geocoding_location_model::Column::Id)
            .all(&self.db)
            .await
    }

    /// Closest cached result whose request point lies within `radius_meters` of `point`.
    pub async fn find_near(
        &self,
        point: Coordinates,
        radius_meters: f64,
    ) -> Result<Option<reverse_geocoding_location_model::Model>, DbErr> {
        use reverse_geocoding_location_model::Column;

        let (lat_delta, lon_delta) = degree_window(point.latitude, radius_meters);
        let candidates = GeocodingEntity::find()
            .filter(Column::RequestLatitude.between(point.latitude - lat_delta, point.latitude + lat_delta))
            .filter(Column::RequestLongitude.between(point.longitude - lon_delta, point.longitude + lon_delta))
            .all(&self.db)
            .await?;

        Ok(candidates
            .into_iter()
            .map(|candidate| {
                let distance = point.distance_meters(&Coordinates::new(
                    candidate.request_longitude,
                    candidate.request_latitude,
                ));
                (distance, candidate)
            })
            .filter(|(distance, _)| *distance <= radius_meters)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, candidate)| candidate))
    }

    pub async fn create(
        &self,
        result: &FormattableGeocodingResult,
    ) -> Result<reverse_geocoding_location_model::Model, DbErr> {
        let now = Utc::now();
        let bbox = result.bounding_box;
        let model = GeocodingActiveModel {
            request_latitude: Set(result.request_coordinates.latitude),
            request_longitude: Set(result.request_coordinates.longitude),
            result_latitude: Set(result.result_coordinates.latitude),
            result_longitude: Set(result.result_coordinates.longitude),
            bbox_south: Set(bbox.map(|b| b.south)),
            bbox_north: Set(bbox.map(|b| b.north)),
            bbox_west: Set(bbox.map(|b| b.west)),
            bbox_east: Set(bbox.map(|b| b.east)),
            display_name: Set(result.formatted_display_name.clone()),
            city: Set(result.city.clone()),
            country: Set(result.country.clone()),
            provider_name: Set(result.provider_name.clone()),
            created_at: Set(now),
            last_accessed_at: Set(now),
            ..Default::default()
        };
        model.insert(&self.db).await
    }

    pub async fn touch(
        &self,
        model: reverse_geocoding_location_model::Model,
    ) -> Result<reverse_geocoding_location_model::Model, DbErr> {
        let mut active_model: GeocodingActiveModel = model.into();
        active_model.last_accessed_at = Set(Utc::now());
        active_model.update(&self.db).await
    }

    /// Manual correction of the user-visible fields
    pub async fn update_names(
        &self,
        id: i64,
        display_name: String,
        city: Option<String>,
        country: Option<String>,
    ) -> Result<Option<reverse_geocoding_location_model::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut active_model: GeocodingActiveModel = existing.into();
        active_model.display_name = Set(display_name);
        active_model.city = Set(city);
        active_model.country = Set(country);
        active_model.update(&self.db).await.map(Some)
    }

    /// Overwrites the provider-derived fields, keeping the original request point.
    pub async fn replace_result(
        &self,
        model: reverse_geocoding_location_model::Model,
        result: &FormattableGeocodingResult,
    ) -> Result<reverse_geocoding_location_model::Model, DbErr> {
        let bbox = result.bounding_box;
        let mut active_model: GeocodingActiveModel = model.into();
        active_model.result_latitude = Set(result.result_coordinates.latitude);
        active_model.result_longitude = Set(result.result_coordinates.longitude);
        active_model.bbox_south = Set(bbox.map(|b| b.south));
        active_model.bbox_north = Set(bbox.map(|b| b.north));
        active_model.bbox_west = Set(bbox.map(|b| b.west));
        active_model.bbox_east = Set(bbox.map(|b| b.east));
        active_model.display_name = Set(result.formatted_display_name.clone());
        active_model.city = Set(result.city.clone());
        active_model.country = Set(result.country.clone());
        active_model.provider_name = Set(result.provider_name.clone());
        active_model.last_accessed_at = Set(Utc::now());
        active_model.update(&self.db).await
    }

    pub async fn find_distinct_providers(&self) -> Result<Vec<String>, DbErr> {
        GeocodingEntity::find()
            .select_only()
            .column(reverse_geocoding_location_model::Column::ProviderName)
            .distinct()
            .order_by_asc(reverse_geocoding_location_model::Column::ProviderName)
            .into_tuple::<String>()
            .all(&self.db)
            .await
    }
}
