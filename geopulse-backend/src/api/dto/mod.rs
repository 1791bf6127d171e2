// src/api/dto/mod.rs
pub mod auth_dto;
pub mod favorite_dto;
pub mod friend_dto;
pub mod geocoding_dto;
pub mod gps_dto;
pub mod insight_dto;
pub mod shared_link_dto;
