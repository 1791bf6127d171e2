// src/api/handlers/geocoding_handler.rs
//! Management of cached reverse-geocoding results.
//!
//! These endpoints answer with bare JSON bodies rather than the `ApiResponse`
//! envelope, and map update/reconcile failures to fixed 500 messages.

use crate::api::dto::geocoding_dto::*;
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedId;
use crate::middleware::auth::AuthenticatedUser;
use crate::repository::reverse_geocoding_repository::{
    parse_sort_order, GeocodingResultFilter, GeocodingSortField,
};
use crate::types::{PageRequest, PaginationMeta};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, info};

pub async fn list_geocoding_results_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<GeocodingListQuery>,
) -> AppResult<Json<GeocodingPageDto>> {
    let page = PageRequest::from_query(query.page, query.limit, DEFAULT_PAGE_SIZE)?;
    let filter = GeocodingResultFilter {
        provider_name: query.provider_name.filter(|v| !v.trim().is_empty()),
        search_text: query.search_text.filter(|v| !v.trim().is_empty()),
    };
    let sort_field = GeocodingSortField::parse(query.sort_field.as_deref());
    let sort_order = parse_sort_order(query.sort_order.as_deref());

    let service = &app_state.geocoding_management_service;
    let data = service
        .get_geocoding_results(&filter, page, sort_field, sort_order)
        .await?;
    let total = service.count_geocoding_results(&filter).await?;

    info!(
        user_id = %user.user_id(),
        page = page.page,
        limit = page.limit,
        total,
        "Listed geocoding results"
    );

    Ok(Json(GeocodingPageDto {
        data,
        pagination: PaginationMeta::new(page.page, page.limit, total),
    }))
}

pub async fn get_geocoding_result_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedId(id): ValidatedId,
) -> AppResult<Json<ReverseGeocodingDto>> {
    let result = app_state
        .geocoding_management_service
        .get_geocoding_result(id)
        .await?;
    Ok(Json(result))
}

pub async fn update_geocoding_result_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedId(id): ValidatedId,
    Json(payload): Json<ReverseGeocodingUpdateDto>,
) -> Response {
    match app_state
        .geocoding_management_service
        .update_geocoding_result(id, payload)
        .await
    {
        Ok(updated) => Json(updated).into_response(),
        Err(
            err @ (AppError::NotFound(_)
            | AppError::ValidationFailure(_)
            | AppError::ValidationError(_)),
        ) => err.into_response(),
        Err(err) => {
            error!(geocoding_id = id, error = %err, "Failed to update geocoding result");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to update geocoding result" })),
            )
                .into_response()
        }
    }
}

pub async fn reconcile_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Json(request): Json<ReverseGeocodingReconcileRequest>,
) -> Response {
    let provider = request.provider_name.clone();
    match app_state
        .geocoding_management_service
        .reconcile_with_provider(request)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(err @ (AppError::ValidationFailure(_) | AppError::ValidationError(_))) => {
            err.into_response()
        }
        Err(err) => {
            error!(provider = %provider, error = %err, "Reconciliation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Reconciliation failed: {}", err) })),
            )
                .into_response()
        }
    }
}

pub async fn enabled_providers_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<Vec<GeocodingProviderDto>> {
    Json(app_state.geocoding_management_service.get_enabled_providers())
}

pub async fn providers_with_data_handler(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> AppResult<Json<Vec<String>>> {
    let providers = app_state
        .geocoding_management_service
        .get_providers_with_data()
        .await?;
    Ok(Json(providers))
}

pub fn geocoding_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/geocoding", get(list_geocoding_results_handler))
        .route("/api/geocoding/reconcile", post(reconcile_handler))
        .route("/api/geocoding/providers", get(enabled_providers_handler))
        .route(
            "/api/geocoding/providers/available",
            get(providers_with_data_handler),
        )
        .route(
            "/api/geocoding/{id}",
            get(get_geocoding_result_handler).put(update_geocoding_result_handler),
        )
        .with_state(app_state)
}
