// src/types/mod.rs
pub mod pagination;
pub mod response;

pub use pagination::{PageRequest, PaginationMeta};
pub use response::ApiResponse;
