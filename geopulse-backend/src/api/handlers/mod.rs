// src/api/handlers/mod.rs
pub mod auth_handler;
pub mod favorite_handler;
pub mod friend_handler;
pub mod geocoding_handler;
pub mod gps_handler;
pub mod journey_insight_handler;
pub mod shared_link_handler;
