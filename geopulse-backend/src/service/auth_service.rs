// src/service/auth_service.rs

use crate::api::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest, UserDto};
use crate::db::DbPool;
use crate::domain::user_model::{self, UserClaims};
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::UserRepository;
use crate::utils::jwt::JwtManager;
use crate::utils::password::{PasswordError, PasswordManager};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct AuthService {
    user_repo: Arc<UserRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
}

impl AuthService {
    pub fn new(
        db_pool: DbPool,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        Self {
            user_repo: Arc::new(UserRepository::new(db_pool)),
            password_manager,
            jwt_manager,
        }
    }

    pub async fn register(&self, payload: RegisterRequest) -> AppResult<AuthResponse> {
        payload.validate()?;
        self.password_manager
            .validate_password_strength(&payload.password)
            .map_err(password_error)?;

        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = self
            .password_manager
            .hash_password(&payload.password)
            .map_err(password_error)?;
        let user = self
            .user_repo
            .create(&payload.email, &payload.full_name, password_hash)
            .await?;

        info!(user_id = %user.id, "User registered");
        self.issue_token(user)
    }

    pub async fn login(&self, payload: LoginRequest) -> AppResult<AuthResponse> {
        payload.validate()?;

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or_else(invalid)?;

        let matches = self
            .password_manager
            .verify_password(&payload.password, &user.password_hash)
            .map_err(password_error)?;
        if !matches {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(invalid());
        }

        info!(user_id = %user.id, "User logged in");
        self.issue_token(user)
    }

    pub async fn current_user(&self, user_id: Uuid) -> AppResult<UserDto> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn issue_token(&self, user: user_model::Model) -> AppResult<AuthResponse> {
        let access_token = self
            .jwt_manager
            .generate_access_token(UserClaims::from(&user))
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        Ok(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.access_token_expiry_seconds(),
            user: user.into(),
        })
    }
}

pub(crate) fn password_error(err: PasswordError) -> AppError {
    match err {
        PasswordError::WeakPassword(message) => AppError::ValidationError(message),
        PasswordError::HashingError(e) => AppError::InternalServerError(e.to_string()),
    }
}
