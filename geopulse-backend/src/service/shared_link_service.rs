// src/service/shared_link_service.rs

use crate::api::dto::shared_link_dto::{
    CreateShareLinkDto, LocationPointDto, ShareAccessTokenDto, SharedLinkDto,
    SharedLocationDto, SharedLocationInfoDto, UpdateShareLinkDto, DEFAULT_HISTORY_HOURS,
};
use crate::config::SharingConfig;
use crate::db::DbPool;
use crate::domain::gps_point_model;
use crate::domain::shared_link_model;
use crate::error::{AppError, AppResult};
use crate::repository::gps_point_repository::GpsPointRepository;
use crate::repository::shared_link_repository::{
    NewSharedLink, SharedLinkChanges, SharedLinkRepository,
};
use crate::repository::user_repository::UserRepository;
use crate::service::auth_service::password_error;
use crate::utils::jwt::{JwtError, JwtManager};
use crate::utils::password::PasswordManager;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct SharedLinkService {
    repo: Arc<SharedLinkRepository>,
    user_repo: Arc<UserRepository>,
    point_repo: Arc<GpsPointRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
    config: SharingConfig,
}

impl SharedLinkService {
    pub fn new(
        db_pool: DbPool,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
        config: SharingConfig,
    ) -> Self {
        Self {
            repo: Arc::new(SharedLinkRepository::new(db_pool.clone())),
            user_repo: Arc::new(UserRepository::new(db_pool.clone())),
            point_repo: Arc::new(GpsPointRepository::new(db_pool)),
            password_manager,
            jwt_manager,
            config,
        }
    }

    // --- Owner operations ---

    pub async fn list_links(&self, user_id: Uuid) -> AppResult<Vec<SharedLinkDto>> {
        let links = self.repo.find_all_for_user(user_id).await?;
        Ok(links.into_iter().map(SharedLinkDto::from).collect())
    }

    pub async fn create_link(
        &self,
        user_id: Uuid,
        payload: CreateShareLinkDto,
    ) -> AppResult<SharedLinkDto> {
        payload.validate()?;
        let now = Utc::now();
        ensure_future(payload.expires_at, now)?;
        self.ensure_below_limit(user_id, now).await?;

        let password_hash = self.hash_optional_password(payload.password.as_deref())?;
        let link = self
            .repo
            .create(NewSharedLink {
                user_id,
                name: payload.name.trim().to_string(),
                expires_at: payload.expires_at,
                password_hash,
                show_history: payload.show_history,
                history_hours: payload.history_hours.unwrap_or(DEFAULT_HISTORY_HOURS),
            })
            .await?;

        info!(user_id = %user_id, link_id = %link.id, "Share link created");
        Ok(link.into())
    }

    pub async fn update_link(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: UpdateShareLinkDto,
    ) -> AppResult<SharedLinkDto> {
        payload.validate()?;
        let now = Utc::now();

        let link = self
            .repo
            .find_by_id_for_user(user_id, id)
            .await?
            .ok_or_else(link_not_found)?;
        ensure_future(payload.expires_at, now)?;

        if reopens(&link, payload.is_active, now) {
            self.ensure_below_limit(user_id, now).await?;
        }

        let password_hash = match payload.password.as_deref() {
            None => None,
            Some(password) => Some(self.hash_optional_password(Some(password))?),
        };

        let changes = SharedLinkChanges {
            name: Some(payload.name.trim().to_string()),
            expires_at: Some(payload.expires_at),
            password_hash,
            show_history: Some(payload.show_history),
            history_hours: payload.history_hours,
            is_active: payload.is_active,
        };

        let updated = self.repo.update(link, changes).await?;
        info!(user_id = %user_id, link_id = %id, "Share link updated");
        Ok(updated.into())
    }

    pub async fn delete_link(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if self.repo.delete_for_user(user_id, id).await? == 0 {
            return Err(link_not_found());
        }
        info!(user_id = %user_id, link_id = %id, "Share link deleted");
        Ok(())
    }

    // --- Public operations ---

    pub async fn get_info(&self, id: Uuid) -> AppResult<SharedLocationInfoDto> {
        let link = self.find_viewable(id).await?;
        let owner = self
            .user_repo
            .find_by_id(link.user_id)
            .await?
            .ok_or_else(link_not_found)?;

        Ok(SharedLocationInfoDto {
            id: link.id,
            has_password: link.has_password(),
            name: link.name,
            show_history: link.show_history,
            history_hours: link.history_hours,
            expires_at: link.expires_at,
            shared_by: owner.full_name,
        })
    }

    /// Checks the password (when set), counts the view and issues a short-lived access token.
    pub async fn verify_access(
        &self,
        id: Uuid,
        password: Option<&str>,
    ) -> AppResult<ShareAccessTokenDto> {
        let link = self.find_viewable(id).await?;

        if let Some(hash) = link.password_hash.as_deref() {
            let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
                AppError::Unauthorized("Password is required for this link".to_string())
            })?;
            if !self
                .password_manager
                .verify_password(password, hash)
                .map_err(password_error)?
            {
                warn!(link_id = %id, "Wrong share link password");
                return Err(AppError::Unauthorized("Invalid password".to_string()));
            }
        }

        self.repo.increment_view_count(id).await?;

        let minutes = self.config.access_token_minutes;
        let access_token = self
            .jwt_manager
            .generate_share_token(id, minutes)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(ShareAccessTokenDto {
            access_token,
            expires_in: minutes * 60,
        })
    }

    pub async fn get_shared_location(
        &self,
        id: Uuid,
        access_token: &str,
    ) -> AppResult<SharedLocationDto> {
        let link = self.find_viewable(id).await?;

        self.jwt_manager
            .verify_share_token(access_token, id)
            .map_err(|e| match e {
                JwtError::TokenExpired => {
                    AppError::Unauthorized("Share access token has expired".to_string())
                }
                _ => AppError::Unauthorized("Invalid share access token".to_string()),
            })?;

        let current = self
            .point_repo
            .find_latest_for_user(link.user_id)
            .await?
            .map(to_location_point);

        let history = if link.show_history {
            let to = Utc::now();
            let from = to - Duration::hours(i64::from(link.history_hours));
            self.point_repo
                .find_between(link.user_id, from, to)
                .await?
                .into_iter()
                .map(to_location_point)
                .collect()
        } else {
            Vec::new()
        };

        Ok(SharedLocationDto { current, history })
    }

    async fn find_viewable(&self, id: Uuid) -> AppResult<shared_link_model::Model> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|link| link.is_viewable_at(Utc::now()))
            .ok_or_else(|| AppError::NotFound("Shared link not found or expired".to_string()))
    }

    async fn ensure_below_limit(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<()> {
        let active = self.repo.count_active_for_user(user_id, now).await?;
        if active >= self.config.max_links_per_user {
            return Err(AppError::BadRequest(format!(
                "You can have at most {} active share links",
                self.config.max_links_per_user
            )));
        }
        Ok(())
    }

    /// Empty or missing password means an unprotected link.
    fn hash_optional_password(&self, password: Option<&str>) -> AppResult<Option<String>> {
        match password.filter(|p| !p.is_empty()) {
            Some(password) => self
                .password_manager
                .hash_password(password)
                .map(Some)
                .map_err(password_error),
            None => Ok(None),
        }
    }
}

fn ensure_future(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> AppResult<()> {
    match expires_at {
        Some(expires_at) if expires_at <= now => Err(AppError::BadRequest(
            "Expiration date must be in the future".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Whether an update makes a currently hidden link viewable again. The update
/// replaces `expires_at` with a value already checked to lie in the future.
fn reopens(link: &shared_link_model::Model, is_active: Option<bool>, now: DateTime<Utc>) -> bool {
    is_active.unwrap_or(link.is_active) && !link.is_viewable_at(now)
}

fn link_not_found() -> AppError {
    AppError::NotFound("Shared link not found".to_string())
}

fn to_location_point(point: gps_point_model::Model) -> LocationPointDto {
    LocationPointDto {
        latitude: point.latitude,
        longitude: point.longitude,
        timestamp: point.timestamp,
        accuracy: point.accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(is_active: bool, expires_at: Option<DateTime<Utc>>) -> shared_link_model::Model {
        shared_link_model::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Trip".to_string(),
            expires_at,
            password_hash: None,
            show_history: false,
            history_hours: DEFAULT_HISTORY_HOURS,
            is_active,
            view_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_expired_link_reopens_without_explicit_flag() {
        let now = Utc::now();
        let expired = link(true, Some(now - Duration::minutes(5)));

        assert!(reopens(&expired, None, now));
        assert!(reopens(&expired, Some(true), now));
        assert!(!reopens(&expired, Some(false), now));
    }

    #[test]
    fn test_visible_or_inactive_links() {
        let now = Utc::now();

        assert!(!reopens(&link(true, None), None, now));
        assert!(!reopens(&link(true, None), Some(true), now));

        let inactive = link(false, None);
        assert!(!reopens(&inactive, None, now));
        assert!(reopens(&inactive, Some(true), now));
    }
}
