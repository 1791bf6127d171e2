// src/extractors/id.rs
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Numeric row id path parameter; malformed values are rejected with a JSON 400 body.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedId(pub i64);

impl<S> FromRequestParts<S> for ValidatedId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Missing path parameter 'id': {}", e)))?;

        raw.parse::<i64>()
            .map(ValidatedId)
            .map_err(|_| AppError::BadRequest(format!("Invalid id format for 'id': '{}'", raw)))
    }
}
