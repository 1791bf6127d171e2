// src/repository/mod.rs
pub mod favorite_repository;
pub mod friend_repository;
pub mod gps_point_repository;
pub mod gps_source_repository;
pub mod reverse_geocoding_repository;
pub mod shared_link_repository;
pub mod user_repository;

use sea_orm::sea_query::LikeExpr;

const LIKE_ESCAPE: char = '\\';

/// Escapes `LIKE` wildcards so `text` only matches itself.
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `LIKE` pattern matching rows that contain `text` literally.
pub(crate) fn contains_pattern(text: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(text))).escape(LIKE_ESCAPE)
}
