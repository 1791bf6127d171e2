// src/utils/jwt.rs

use crate::domain::user_model::UserClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";
const SHARE_TOKEN_TYPE: &str = "share";

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to decode JWT: {0}")]
    DecodingError(String),

    #[error("JWT token has expired")]
    TokenExpired,

    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Missing JWT secret key")]
    MissingSecretKey,

    #[error("Invalid JWT configuration: {0}")]
    ConfigurationError(String),
}

/// Claims of a user's API access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
    pub typ: String,
    pub user: UserClaims,
}

/// Claims of the token a viewer receives after opening a share link
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShareAccessClaims {
    /// Subject (shared link ID)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
    pub typ: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret_key: String,
    pub access_token_expiry_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            access_token_expiry_minutes: 60,
            issuer: "geopulse".to_string(),
            audience: "geopulse-users".to_string(),
        }
    }
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, JwtError> {
        let secret_key = env::var("JWT_SECRET_KEY").map_err(|_| JwtError::MissingSecretKey)?;

        let access_token_expiry_minutes = env::var("JWT_ACCESS_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| JwtError::ConfigurationError("Invalid access token expiry".to_string()))?;

        Ok(Self {
            secret_key,
            access_token_expiry_minutes,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "geopulse".to_string()),
            audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "geopulse-users".to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), JwtError> {
        if self.secret_key.len() < 32 {
            return Err(JwtError::ConfigurationError(
                "JWT secret key must be at least 32 characters".to_string(),
            ));
        }

        if self.access_token_expiry_minutes <= 0 {
            return Err(JwtError::ConfigurationError(
                "Access token expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

pub struct JwtManager {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtManager {
    pub fn new(config: JwtConfig) -> Result<Self, JwtError> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret_key.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret_key.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.config.access_token_expiry_minutes * 60
    }

    pub fn generate_access_token(&self, user: UserClaims) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.config.access_token_expiry_minutes);

        let claims = AccessTokenClaims {
            sub: user.user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: ACCESS_TOKEN_TYPE.to_string(),
            user,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::EncodingError)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessTokenClaims, JwtError> {
        let token_data = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        if token_data.claims.typ != ACCESS_TOKEN_TYPE {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    pub fn generate_share_token(
        &self,
        link_id: Uuid,
        validity_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(validity_minutes);

        let claims = ShareAccessClaims {
            sub: link_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
            typ: SHARE_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(JwtError::EncodingError)
    }

    /// Verifies a share access token and checks it was issued for `link_id`.
    pub fn verify_share_token(&self, token: &str, link_id: Uuid) -> Result<(), JwtError> {
        let token_data = decode::<ShareAccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?;

        if token_data.claims.typ != SHARE_TOKEN_TYPE || token_data.claims.sub != link_id.to_string()
        {
            return Err(JwtError::InvalidToken);
        }

        Ok(())
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::DecodingError(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new(JwtConfig {
            secret_key: "test-secret-key-that-is-at-least-32-characters-long".to_string(),
            ..JwtConfig::default()
        })
        .unwrap()
    }

    fn claims() -> UserClaims {
        UserClaims {
            user_id: Uuid::new_v4(),
            email: "anna@example.com".to_string(),
            full_name: "Anna".to_string(),
            role: "USER".to_string(),
        }
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = JwtManager::new(JwtConfig {
            secret_key: "short".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(result, Err(JwtError::ConfigurationError(_))));
    }

    #[test]
    fn test_access_token_carries_user() {
        let manager = manager();
        let user = claims();
        let token = manager.generate_access_token(user.clone()).unwrap();

        let decoded = manager.verify_access_token(&token).unwrap();
        assert_eq!(decoded.sub, user.user_id.to_string());
        assert_eq!(decoded.user.email, "anna@example.com");
    }

    #[test]
    fn test_share_token_is_not_an_access_token() {
        let manager = manager();
        let link_id = Uuid::new_v4();
        let token = manager.generate_share_token(link_id, 5).unwrap();

        assert!(manager.verify_access_token(&token).is_err());
        assert!(manager.verify_share_token(&token, link_id).is_ok());
        assert!(matches!(
            manager.verify_share_token(&token, Uuid::new_v4()),
            Err(JwtError::InvalidToken)
        ));
    }
}
