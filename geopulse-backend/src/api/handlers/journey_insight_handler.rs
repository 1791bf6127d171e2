// src/api/handlers/journey_insight_handler.rs
use crate::api::dto::insight_dto::JourneyInsights;
use crate::api::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

pub async fn journey_insights_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<JourneyInsights>> {
    let insights = app_state
        .journey_insight_service
        .get_journey_insights(user.user_id())
        .await?;
    Ok(Json(insights))
}

pub fn journey_insight_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/journey-insights", get(journey_insights_handler))
        .with_state(app_state)
}
