// src/service/geocoding_management_service.rs

use crate::api::dto::geocoding_dto::{
    GeocodingProviderDto, ReconcileFailureDto, ReverseGeocodingDto,
    ReverseGeocodingReconcileRequest, ReverseGeocodingReconcileResult, ReverseGeocodingUpdateDto,
};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::infrastructure::geocoding::GeocodingProviderRegistry;
use crate::repository::reverse_geocoding_repository::{
    GeocodingResultFilter, GeocodingSortField, ReverseGeocodingRepository,
};
use crate::types::PageRequest;
use crate::utils::geo::Coordinates;
use sea_orm::Order;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

/// Browsing, correcting and re-resolving cached reverse geocoding results.
pub struct GeocodingManagementService {
    repo: Arc<ReverseGeocodingRepository>,
    registry: Arc<GeocodingProviderRegistry>,
}

impl GeocodingManagementService {
    pub fn new(db_pool: DbPool, registry: Arc<GeocodingProviderRegistry>) -> Self {
        Self {
            repo: Arc::new(ReverseGeocodingRepository::new(db_pool)),
            registry,
        }
    }

    pub async fn get_geocoding_results(
        &self,
        filter: &GeocodingResultFilter,
        page: PageRequest,
        sort_field: GeocodingSortField,
        sort_order: Order,
    ) -> AppResult<Vec<ReverseGeocodingDto>> {
        let rows = self
            .repo
            .find_page(filter, page.limit, page.offset(), sort_field, sort_order)
            .await?;
        Ok(rows.into_iter().map(ReverseGeocodingDto::from).collect())
    }

    pub async fn count_geocoding_results(&self, filter: &GeocodingResultFilter) -> AppResult<u64> {
        Ok(self.repo.count(filter).await?)
    }

    pub async fn get_geocoding_result(&self, id: i64) -> AppResult<ReverseGeocodingDto> {
        self.repo
            .find_by_id(id)
            .await?
            .map(ReverseGeocodingDto::from)
            .ok_or_else(|| not_found(id))
    }

    pub async fn update_geocoding_result(
        &self,
        id: i64,
        payload: ReverseGeocodingUpdateDto,
    ) -> AppResult<ReverseGeocodingDto> {
        payload.validate()?;

        let normalize = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let updated = self
            .repo
            .update_names(
                id,
                payload.display_name.trim().to_string(),
                normalize(payload.city),
                normalize(payload.country),
            )
            .await?
            .ok_or_else(|| not_found(id))?;

        info!(id, "Geocoding result updated");
        Ok(updated.into())
    }

    /// Re-queries one provider for the selected rows. Individual failures are
    /// reported in the result, an unknown provider fails the whole request.
    pub async fn reconcile_with_provider(
        &self,
        request: ReverseGeocodingReconcileRequest,
    ) -> AppResult<ReverseGeocodingReconcileResult> {
        request.validate()?;
        let provider = self.registry.get(&request.provider_name)?;

        let targets = if request.reconcile_all {
            self.repo.find_all().await?
        } else {
            self.repo.find_by_ids(&request.geocoding_ids).await?
        };

        let mut result = ReverseGeocodingReconcileResult {
            total_processed: targets.len() as u64,
            ..Default::default()
        };

        for row in targets {
            let id = row.id;
            let point = Coordinates::new(row.request_longitude, row.request_latitude);

            let outcome = match provider.reverse_geocode(point).await {
                Ok(fresh) => self
                    .repo
                    .replace_result(row, &fresh)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match outcome {
                Ok(_) => result.success_count += 1,
                Err(message) => {
                    warn!(id, provider = provider.name(), error = %message, "Reconciliation of row failed");
                    result.failed_count += 1;
                    result.errors.push(ReconcileFailureDto {
                        geocoding_id: id,
                        message,
                    });
                }
            }
        }

        info!(
            provider = provider.name(),
            total = result.total_processed,
            succeeded = result.success_count,
            failed = result.failed_count,
            "Geocoding reconciliation finished"
        );
        Ok(result)
    }

    pub fn get_enabled_providers(&self) -> Vec<GeocodingProviderDto> {
        self.registry
            .enabled_providers()
            .into_iter()
            .map(GeocodingProviderDto::from)
            .collect()
    }

    pub async fn get_providers_with_data(&self) -> AppResult<Vec<String>> {
        Ok(self.repo.find_distinct_providers().await?)
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Geocoding result not found: {}", id))
}
