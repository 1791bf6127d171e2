// src/service/gps_source_service.rs

use crate::api::dto::gps_dto::{CreateGpsSourceDto, GpsSourceDto};
use crate::db::DbPool;
use crate::domain::gps_source_type::GpsSourceType;
use crate::error::{AppError, AppResult};
use crate::repository::gps_source_repository::{GpsSourceRepository, NewGpsSource};
use crate::service::auth_service::password_error;
use crate::utils::password::PasswordManager;
use crate::utils::validation::validate_device_username;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

pub struct GpsSourceService {
    repo: Arc<GpsSourceRepository>,
    password_manager: Arc<PasswordManager>,
}

impl GpsSourceService {
    pub fn new(db_pool: DbPool, password_manager: Arc<PasswordManager>) -> Self {
        Self {
            repo: Arc::new(GpsSourceRepository::new(db_pool)),
            password_manager,
        }
    }

    pub async fn list_sources(&self, user_id: Uuid) -> AppResult<Vec<GpsSourceDto>> {
        let sources = self.repo.find_all_for_user(user_id).await?;
        Ok(sources.into_iter().map(GpsSourceDto::from).collect())
    }

    pub async fn create_source(
        &self,
        user_id: Uuid,
        payload: CreateGpsSourceDto,
    ) -> AppResult<GpsSourceDto> {
        payload.validate()?;

        let source_type = GpsSourceType::from_str(&payload.source_type).ok_or_else(|| {
            AppError::BadRequest(format!("Unsupported GPS source type: {}", payload.source_type))
        })?;

        let new_source = match source_type {
            GpsSourceType::Owntracks => {
                let username = payload
                    .username
                    .map(|u| u.trim().to_string())
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| {
                        AppError::BadRequest("OwnTracks sources require a username".to_string())
                    })?;
                let password = payload.password.filter(|p| !p.is_empty()).ok_or_else(|| {
                    AppError::BadRequest("OwnTracks sources require a password".to_string())
                })?;

                validate_device_username(&username).map_err(|_| {
                    AppError::ValidationError(
                        "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
                    )
                })?;
                if self.repo.username_exists(&username).await? {
                    return Err(AppError::Conflict(format!(
                        "Username '{}' is already in use",
                        username
                    )));
                }

                let password_hash = self
                    .password_manager
                    .hash_password(&password)
                    .map_err(password_error)?;

                NewGpsSource {
                    user_id,
                    source_type,
                    username: Some(username),
                    password_hash: Some(password_hash),
                    token: None,
                }
            }
            GpsSourceType::Overland => {
                let token = match payload.token.map(|t| t.trim().to_string()) {
                    Some(token) if !token.is_empty() => token,
                    _ => generate_token(),
                };
                if self.repo.token_exists(&token).await? {
                    return Err(AppError::Conflict("Token is already in use".to_string()));
                }

                NewGpsSource {
                    user_id,
                    source_type,
                    username: None,
                    password_hash: None,
                    token: Some(token),
                }
            }
        };

        let source = self.repo.create(new_source).await?;
        info!(user_id = %user_id, source_id = %source.id, source_type = %source_type, "GPS source created");
        Ok(source.into())
    }

    pub async fn set_source_active(
        &self,
        user_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> AppResult<GpsSourceDto> {
        let source = self
            .repo
            .set_active(user_id, id, active)
            .await?
            .ok_or_else(|| AppError::NotFound("GPS source not found".to_string()))?;
        info!(user_id = %user_id, source_id = %id, active, "GPS source status changed");
        Ok(source.into())
    }

    pub async fn delete_source(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if self.repo.delete_for_user(user_id, id).await? == 0 {
            return Err(AppError::NotFound("GPS source not found".to_string()));
        }
        info!(user_id = %user_id, source_id = %id, "GPS source deleted");
        Ok(())
    }
}

/// Random URL-safe token for Overland endpoints
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_and_url_safe() {
        let first = generate_token();
        let second = generate_token();
        assert_ne!(first, second);
        assert_eq!(first.len(), 43);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
