// src/api/mod.rs
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::infrastructure::geocoding::GeocodingProviderRegistry;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::cors::cors_layer;
use crate::service::{
    auth_service::AuthService, favorite_service::FavoriteService, friend_service::FriendService,
    geocoding_management_service::GeocodingManagementService,
    geocoding_service::GeocodingService, gps_point_service::GpsPointService,
    gps_source_service::GpsSourceService, journey_insight_service::JourneyInsightService,
    shared_link_service::SharedLinkService,
};
use crate::utils::jwt::JwtManager;
use crate::utils::password::PasswordManager;
use axum::{middleware as axum_middleware, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// Shared application state handed to every router
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub geocoding_service: Arc<GeocodingService>,
    pub geocoding_management_service: Arc<GeocodingManagementService>,
    pub favorite_service: Arc<FavoriteService>,
    pub journey_insight_service: Arc<JourneyInsightService>,
    pub shared_link_service: Arc<SharedLinkService>,
    pub friend_service: Arc<FriendService>,
    pub gps_source_service: Arc<GpsSourceService>,
    pub gps_point_service: Arc<GpsPointService>,
    pub jwt_manager: Arc<JwtManager>,
    pub db_pool: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Builds every service, with geocoding providers taken from `config`.
    pub fn new(db_pool: DbPool, config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let registry = GeocodingProviderRegistry::from_config(&config.geocoding)?;
        Self::with_registry(db_pool, config, Arc::new(registry))
    }

    pub fn with_registry(
        db_pool: DbPool,
        config: AppConfig,
        registry: Arc<GeocodingProviderRegistry>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let jwt_manager = Arc::new(JwtManager::new(config.jwt.clone())?);
        let password_manager = Arc::new(PasswordManager::new());

        let geocoding_service = Arc::new(GeocodingService::new(db_pool.clone(), registry.clone()));

        Ok(Self {
            auth_service: Arc::new(AuthService::new(
                db_pool.clone(),
                password_manager.clone(),
                jwt_manager.clone(),
            )),
            geocoding_management_service: Arc::new(GeocodingManagementService::new(
                db_pool.clone(),
                registry,
            )),
            favorite_service: Arc::new(FavoriteService::new(
                db_pool.clone(),
                geocoding_service.clone(),
            )),
            geocoding_service,
            journey_insight_service: Arc::new(JourneyInsightService::new(db_pool.clone())),
            shared_link_service: Arc::new(SharedLinkService::new(
                db_pool.clone(),
                password_manager.clone(),
                jwt_manager.clone(),
                config.sharing.clone(),
            )),
            friend_service: Arc::new(FriendService::new(db_pool.clone())),
            gps_source_service: Arc::new(GpsSourceService::new(
                db_pool.clone(),
                password_manager.clone(),
            )),
            gps_point_service: Arc::new(GpsPointService::new(db_pool.clone(), password_manager)),
            jwt_manager,
            db_pool,
            config: Arc::new(config),
        })
    }
}

/// Gives extractors access to the JWT manager
pub trait HasJwtManager {
    fn jwt_manager(&self) -> &Arc<JwtManager>;
}

impl HasJwtManager for AppState {
    fn jwt_manager(&self) -> &Arc<JwtManager> {
        &self.jwt_manager
    }
}

/// Full application router with CORS, tracing and request logging.
pub fn create_router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/health", get(health_handler))
        .merge(handlers::auth_handler::auth_router(app_state.clone()))
        .merge(handlers::geocoding_handler::geocoding_router(app_state.clone()))
        .merge(handlers::favorite_handler::favorite_router(app_state.clone()))
        .merge(handlers::journey_insight_handler::journey_insight_router(
            app_state.clone(),
        ))
        .merge(handlers::shared_link_handler::shared_link_router(
            app_state.clone(),
        ))
        .merge(handlers::friend_handler::friend_router(app_state.clone()))
        .merge(handlers::gps_handler::gps_router(app_state))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "UP" }))
}
