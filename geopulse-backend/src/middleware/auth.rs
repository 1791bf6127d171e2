// src/middleware/auth.rs

use crate::api::HasJwtManager;
use crate::domain::user_model::UserClaims;
use crate::error::AppError;
use crate::utils::jwt::JwtError;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};
use uuid::Uuid;

/// Signed-in user extracted from the `Authorization: Bearer` access token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserClaims);

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: HasJwtManager + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!(path = %parts.uri.path(), "Authentication attempt without token");
            AppError::Unauthorized("Missing authentication token".to_string())
        })?;

        let access_claims = state
            .jwt_manager()
            .verify_access_token(token)
            .map_err(|e| {
                warn!(error = %e, "JWT verification failed");
                match e {
                    JwtError::TokenExpired => {
                        AppError::Unauthorized("Access token has expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid access token".to_string()),
                }
            })?;

        if !access_claims.user.has_user_role() {
            warn!(user_id = %access_claims.user.user_id, role = %access_claims.user.role, "Access denied: USER role required");
            return Err(AppError::Forbidden("Access denied".to_string()));
        }

        debug!(user_id = %access_claims.user.user_id, "User authenticated");

        Ok(AuthenticatedUser(access_claims.user))
    }
}

/// Token from an `Authorization: Bearer <token>` header, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
