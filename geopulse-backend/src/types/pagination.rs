// src/types/pagination.rs

use crate::error::{AppError, AppResult};
use serde::Serialize;

pub const MAX_PAGE_SIZE: u64 = 1000;

/// Pagination block of list responses; `totalPages = ceil(total / limit)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit.max(1)),
        }
    }
}

/// Validated 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Rejects zero or negative values and pages whose row offset does not fit
    /// a signed 64-bit SQL integer. Caps the page size at [`MAX_PAGE_SIZE`].
    pub fn from_query(
        page: Option<i64>,
        limit: Option<i64>,
        default_limit: u64,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(default_limit as i64);

        if page < 1 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }

        let request = Self {
            page: page as u64,
            limit: (limit as u64).min(MAX_PAGE_SIZE),
        };
        if request.checked_offset().is_none() {
            return Err(AppError::BadRequest("page is too large".to_string()));
        }
        Ok(request)
    }

    fn checked_offset(&self) -> Option<u64> {
        (self.page - 1)
            .checked_mul(self.limit)
            .filter(|offset| *offset <= i64::MAX as u64)
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        self.checked_offset().unwrap_or(i64::MAX as u64)
    }
}
