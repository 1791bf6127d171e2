// src/service/mod.rs
pub mod auth_service;
pub mod favorite_service;
pub mod friend_service;
pub mod geocoding_management_service;
pub mod geocoding_service;
pub mod gps_point_service;
pub mod gps_source_service;
pub mod journey_insight_service;
pub mod shared_link_service;
